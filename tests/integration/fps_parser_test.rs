use droidtop::core::privileged::{foreground_package, frames_in_window};

fn lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

/// Trimmed-down capture of a real window-state dump.
const ACTIVITY_DUMP: &str = r#"ACTIVITY MANAGER ACTIVITIES (dumpsys activity activities)
Display #0 (activities from top to bottom):
  * Task{d1f2e30 #7342 type=standard A=10241:com.example.racer U=0 visible=true}
    mLastPausedActivity: ActivityRecord{5b8cf41 u0 com.android.launcher3/.uioverrides.QuickstepLauncher t112}
    topResumedActivity=ActivityRecord{9e05a77 u0 com.example.racer/.GameActivity t7342}
  * Task{77aa210 #112 type=home}
ResumedActivity: ActivityRecord{9e05a77 u0 com.example.racer/.GameActivity t7342}
"#;

#[test]
fn foreground_package_from_real_dump_shape() {
    // the resumed-activity marker wins over the earlier paused record
    assert_eq!(
        foreground_package(&lines(ACTIVITY_DUMP)).as_deref(),
        Some("com.example.racer")
    );
}

#[test]
fn foreground_package_ignores_unrelated_lines() {
    let dump = lines("Display #0\n  mFocusedWindow=Window{abc u0 StatusBar}\n");
    assert_eq!(foreground_package(&dump), None);
}

#[test]
fn frame_window_from_real_dump_shape() {
    let now: i64 = 20_000_000_000;
    let dump = format!(
        r#"Applications Graphics Acceleration Info:
Uptime: 81913840 Realtime: 151930273

** Graphics info for pid 14302 [com.example.racer] **

Stats since: 71524659218882ns
Total frames rendered: 12873
Janky frames: 291 (2.26%)

---PROFILEDATA---
Flags,IntendedVsync,Vsync,OldestInputEvent,NewestInputEvent,HandleInputStart,AnimationStart,PerformTraversalsStart,DrawStart,SyncQueued,SyncStart,IssueDrawCommandsStart,SwapBuffers,FrameCompleted,DequeueBufferDuration,QueueBufferDuration,
0,{a},{a},9223372036854775807,0,{a},{a},{a},{a},{a},{a},{a},{a},{a},1081771,630521,
0,{b},{b},9223372036854775807,0,{b},{b},{b},{b},{b},{b},{b},{b},{b},1325000,484895,
0,{c},{c},9223372036854775807,0,{c},{c},{c},{c},{c},{c},{c},{c},{c},990624,532812,
---PROFILEDATA---
"#,
        a = now - 100_000_000,   // 100ms ago
        b = now - 900_000_000,   // 900ms ago
        c = now - 5_000_000_000i64, // 5s ago, outside the window
    );
    assert_eq!(frames_in_window(&lines(&dump), now, 1_000_000_000), 2);
}

#[test]
fn frame_window_with_no_profile_section_is_zero() {
    let dump = lines("Total frames rendered: 12873\nJanky frames: 291 (2.26%)\n");
    assert_eq!(frames_in_window(&dump, 1_000_000_000, 1_000_000_000), 0);
}

#[test]
fn frame_window_survives_mixed_garbage_rows() {
    let now: i64 = 9_000_000_000;
    let dump = format!(
        "---PROFILEDATA---\n\
         Flags,IntendedVsync,FrameCompleted,\n\
         0,1,{ok},\n\
         0,1,oops,\n\
         0,1,{ok2},\n\
         ---PROFILEDATA---\n",
        ok = now - 10_000_000,
        ok2 = now - 20_000_000,
    );
    assert_eq!(frames_in_window(&lines(&dump), now, 1_000_000_000), 2);
}
