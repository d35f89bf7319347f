//! `glyphwire` CLI: render a line of text from a TrueType font to an
//! SVG wireframe preview.

use std::env;
use std::fs;
use std::process;

use glyphwire_font::FontFile;
use glyphwire_svg::{render_line_with_options, PreviewOptions};
use glyphwire_tess::DEFAULT_TOLERANCE;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: glyphwire <font.ttf> <text> [--output <file>] [--size <px>] [--tolerance <fu>]");
        process::exit(1);
    }

    let config = parse_args(&args);

    let bytes = match fs::read(&config.font_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error reading {}: {e}", config.font_path);
            process::exit(1);
        }
    };
    let font = match FontFile::load(bytes) {
        Ok(font) => font,
        Err(e) => {
            eprintln!("Error parsing {}: {e}", config.font_path);
            process::exit(1);
        }
    };

    let opts = PreviewOptions {
        font_size_px: config.font_size_px,
        tolerance: config.tolerance,
        ..PreviewOptions::default()
    };
    let document = match render_line_with_options(&font, &config.text, &opts) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Error rendering: {e}");
            process::exit(1);
        }
    };

    match fs::write(&config.output, document.to_string()) {
        Ok(()) => {
            eprintln!(
                "Wrote {} ({} glyphs, {} units/em)",
                config.output,
                config.text.chars().filter(|&c| c != '\n').count(),
                font.units_per_em()
            );
        }
        Err(e) => {
            eprintln!("Error writing {}: {e}", config.output);
            process::exit(1);
        }
    }
}

struct Config {
    font_path: String,
    text: String,
    output: String,
    font_size_px: f32,
    tolerance: f32,
}

fn parse_args(args: &[String]) -> Config {
    let mut positional = Vec::new();
    let mut output = String::from("out.svg");
    let mut font_size_px = 64.0f32;
    let mut tolerance = DEFAULT_TOLERANCE;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--output" | "-o" => {
                i += 1;
                if i < args.len() {
                    output.clone_from(&args[i]);
                }
            }
            "--size" => {
                i += 1;
                if i < args.len() {
                    font_size_px = parse_number(&args[i], "--size");
                }
            }
            "--tolerance" => {
                i += 1;
                if i < args.len() {
                    tolerance = parse_number(&args[i], "--tolerance");
                }
            }
            "--help" | "-h" => {
                println!("glyphwire: TrueType wireframe preview");
                println!();
                println!("Usage:");
                println!("  glyphwire <font.ttf> <text>          Render text, write out.svg");
                println!("  glyphwire <font.ttf> <text> -o f.svg Set the output file");
                println!("  --size <px>                          Em size in pixels (default 64)");
                println!("  --tolerance <fu>                     Flattening tolerance (default 0.75)");
                process::exit(0);
            }
            other => positional.push(other.to_owned()),
        }
        i += 1;
    }

    if positional.len() != 2 {
        eprintln!("Expected a font path and a text argument");
        process::exit(1);
    }
    let mut positional = positional.into_iter();
    Config {
        font_path: positional.next().unwrap_or_default(),
        text: positional.next().unwrap_or_default(),
        output,
        font_size_px,
        tolerance,
    }
}

fn parse_number(arg: &str, flag: &str) -> f32 {
    match arg.parse() {
        Ok(v) => v,
        Err(_) => {
            eprintln!("Invalid value for {flag}: {arg}");
            process::exit(1);
        }
    }
}
