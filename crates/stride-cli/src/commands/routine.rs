use stride_core::Config;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let routine = Config::load_or_default().routine();
    println!("{}", serde_json::to_string_pretty(&routine)?);
    Ok(())
}
