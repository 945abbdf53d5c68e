use anyhow::Result;

pub fn execute() -> Result<()> {
    println!("droidtop version {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
