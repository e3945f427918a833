use std::path::PathBuf;

use clap::Parser;
use vnav_profile::export::plot::render_altitude_plot;
use vnav_profile::export::read_json;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Render an exported vertical profile (JSON) as an altitude/distance PNG"
)]
struct Cli {
    #[arg(long)]
    input: PathBuf,
    #[arg(long, default_value = "artifacts/profile.png")]
    output: PathBuf,
    #[arg(long, default_value_t = 1200)]
    width: u32,
    #[arg(long, default_value_t = 600)]
    height: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let document = read_json(&cli.input)?;
    render_altitude_plot(&document, &cli.output, (cli.width, cli.height))?;
    println!("[ok] {}", cli.output.display());
    Ok(())
}
