use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use clap::{Parser, ValueEnum};
use log::info;
use qrstyle::{dimensions, ECLevel, QRBuilder, RenderConfig, Unit};

/// Render text as a styled QR code
#[derive(Parser, Debug)]
#[command(name = "qrstyle", version, about = "Render text as a QR code in SVG, PNG or JPEG")]
struct Cli {
    /// Text to encode, used as given without trimming
    text: String,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = FormatArg::Svg)]
    format: FormatArg,

    /// Error correction level
    #[arg(long, short = 'e', value_enum, default_value_t = ECLevelArg::M)]
    ec_level: ECLevelArg,

    /// Finder pattern shape: square | dot | rounded | triangle
    #[arg(long, default_value = "square")]
    finder_shape: String,

    /// Data module shape: square | dot | rounded | triangle
    #[arg(long, default_value = "square")]
    data_shape: String,

    /// Finder pattern color: #rrggbb, #rgb or a CSS color name
    #[arg(long, default_value = "black")]
    finder_color: String,

    /// Data module color: #rrggbb, #rgb or a CSS color name
    #[arg(long, default_value = "black")]
    data_color: String,

    /// Output file (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Write the image as base64 text
    #[arg(long)]
    base64: bool,

    /// Print the pixel width and height of the image instead of rendering it
    #[arg(long)]
    dimensions: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum FormatArg {
    Svg,
    Png,
    Jpeg,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ECLevelArg {
    L,
    M,
    Q,
    H,
}

impl From<ECLevelArg> for ECLevel {
    fn from(arg: ECLevelArg) -> Self {
        match arg {
            ECLevelArg::L => ECLevel::L,
            ECLevelArg::M => ECLevel::M,
            ECLevelArg::Q => ECLevel::Q,
            ECLevelArg::H => ECLevel::H,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let bytes = run(&cli)?;

    match &cli.output {
        Some(path) => {
            fs::write(path, &bytes).with_context(|| format!("Failed to write {}", path.display()))?
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&bytes)?;
            if cli.base64 || cli.dimensions {
                writeln!(stdout)?;
            }
        }
    }
    Ok(())
}

// Bytes to write: the rendered image, its base64 text, or `WxH`
fn run(cli: &Cli) -> Result<Vec<u8>> {
    if cli.text.trim().is_empty() {
        bail!("Nothing to encode: text is empty or whitespace");
    }
    let ecl = ECLevel::from(cli.ec_level);
    let config =
        RenderConfig::parse(&cli.finder_shape, &cli.data_shape, &cli.finder_color, &cli.data_color)
            .context("Invalid render options")?;

    if cli.dimensions {
        let (w, h) = dimensions(&cli.text, ecl, Unit::Pixels)?;
        config.release();
        return Ok(format!("{w}x{h}").into_bytes());
    }

    let qr = QRBuilder::new(cli.text.as_bytes())
        .ec_level(ecl)
        .build()
        .with_context(|| format!("Failed to encode {} bytes", cli.text.len()))?;
    info!("Version {}, level {ecl}, {} modules wide", qr.version(), qr.width());

    let bytes = match cli.format {
        FormatArg::Svg => qr.to_svg(&config)?.into_bytes(),
        FormatArg::Png => qr.to_png(&config)?,
        FormatArg::Jpeg => qr.to_jpeg(&config)?,
    };
    config.release();

    Ok(if cli.base64 { STANDARD.encode(bytes).into_bytes() } else { bytes })
}
