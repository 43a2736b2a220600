fn main() -> anyhow::Result<()> {
    sitetheme::run()?;
    Ok(())
}
