use anyhow::Result;

fn main() -> Result<()> {
    pretty_env_logger::init();

    pollster::block_on(still_life::window::run())?;

    Ok(())
}
