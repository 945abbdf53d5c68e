use std::cell::Cell;

use droidtop::core::privileged::{resolve_tier, AccessTier, TierPreference, TierProbe};

#[derive(Default)]
struct RecordingProbe {
    elevated: bool,
    superuser: bool,
    elevated_probes: Cell<u32>,
    superuser_probes: Cell<u32>,
}

impl RecordingProbe {
    fn new(elevated: bool, superuser: bool) -> Self {
        Self {
            elevated,
            superuser,
            ..Default::default()
        }
    }
}

impl TierProbe for RecordingProbe {
    fn elevated_available(&self) -> bool {
        self.elevated_probes.set(self.elevated_probes.get() + 1);
        self.elevated
    }

    fn superuser_available(&self) -> bool {
        self.superuser_probes.set(self.superuser_probes.get() + 1);
        self.superuser
    }
}

#[test]
fn auto_resolution_matrix() {
    let cases = [
        (true, true, AccessTier::Elevated),
        (true, false, AccessTier::Elevated),
        (false, true, AccessTier::Superuser),
        (false, false, AccessTier::None),
    ];
    for (elevated, superuser, expected) in cases {
        let probe = RecordingProbe::new(elevated, superuser);
        assert_eq!(
            resolve_tier(TierPreference::Auto, &probe),
            expected,
            "elevated={elevated} superuser={superuser}"
        );
    }
}

#[test]
fn pinned_elevated_never_touches_the_superuser_probe() {
    let probe = RecordingProbe::new(false, true);
    assert_eq!(
        resolve_tier(TierPreference::Elevated, &probe),
        AccessTier::None
    );
    assert_eq!(probe.elevated_probes.get(), 1);
    assert_eq!(probe.superuser_probes.get(), 0);
}

#[test]
fn pinned_superuser_never_touches_the_elevated_probe() {
    let probe = RecordingProbe::new(true, true);
    assert_eq!(
        resolve_tier(TierPreference::Superuser, &probe),
        AccessTier::Superuser
    );
    assert_eq!(probe.elevated_probes.get(), 0);
    assert_eq!(probe.superuser_probes.get(), 1);
}

#[test]
fn resolution_is_reevaluated_per_call() {
    // Availability can change between calls; two resolutions must probe
    // twice, not reuse a cached answer.
    let probe = RecordingProbe::new(true, false);
    let _ = resolve_tier(TierPreference::Auto, &probe);
    let _ = resolve_tier(TierPreference::Auto, &probe);
    assert_eq!(probe.elevated_probes.get(), 2);
}
