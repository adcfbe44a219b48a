extern crate clap;
extern crate densitybrot;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use densitybrot::{ColorPolicy, OutputError, Renderer, Report, RunConfig, Viewport};
use num::Complex;
use std::path::Path;
use std::process;
use std::str::FromStr;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    parse_pair(s, ',').map(|(re, im)| Complex { re, im })
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const THREADS: &str = "threads";
const ITERATIONS: &str = "iterations";
const POLICY: &str = "policy";
const STATS: &str = "stats";

const MAX_ITERATIONS: usize = 1_000_000;

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("buddha")
        .version("0.3.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Buddhabrot density renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file (PNG)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .required(false)
                .long(LEFTLOWER)
                .short("l")
                .allow_hyphen_values(true)
                .takes_value(true)
                .default_value("-2,-1")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse left lower corner"))
                .help("Left lower corner of the viewport"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .required(false)
                .long(RIGHTUPPER)
                .short("r")
                .allow_hyphen_values(true)
                .takes_value(true)
                .default_value("1,1")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse right upper corner"))
                .help("Right upper corner of the viewport"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("1")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("2000")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        MAX_ITERATIONS,
                        "Could not parse iteration count",
                        &format!("Iteration count must be between 1 and {}", MAX_ITERATIONS),
                    )
                })
                .help("Maximum iterations per orbit"),
        )
        .arg(
            Arg::with_name(POLICY)
                .required(false)
                .long(POLICY)
                .short("p")
                .takes_value(true)
                .possible_values(ColorPolicy::NAMES)
                .default_value("percentile")
                .help("How counts are turned into colors"),
        )
        .arg(
            Arg::with_name(STATS)
                .long(STATS)
                .help("Print count statistics after rendering"),
        )
        .get_matches()
}

// Everything in `matches` already passed its validator.
fn config(matches: &ArgMatches) -> Result<RunConfig, String> {
    let size: (usize, usize) = matches
        .value_of(SIZE)
        .and_then(|s| parse_pair(s, 'x'))
        .ok_or("Error parsing image dimensions")?;
    let leftlower = matches
        .value_of(LEFTLOWER)
        .and_then(parse_complex)
        .ok_or("Error parsing left lower point")?;
    let rightupper = matches
        .value_of(RIGHTUPPER)
        .and_then(parse_complex)
        .ok_or("Error parsing right upper point")?;
    let threads = matches
        .value_of(THREADS)
        .and_then(|s| usize::from_str(s).ok())
        .ok_or("Could not parse thread count")?;
    let iterations = matches
        .value_of(ITERATIONS)
        .and_then(|s| usize::from_str(s).ok())
        .ok_or("Could not parse iteration count")?;

    let viewport = Viewport::new(leftlower, rightupper).map_err(|e| e.to_string())?;
    RunConfig::new(size.0, size.1, iterations)
        .and_then(|c| c.with_threads(threads))
        .map(|c| c.with_viewport(viewport))
        .map_err(|e| e.to_string())
}

fn main() {
    env_logger::init();
    let matches = args();

    let config = match config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid parameters: {}", e);
            process::exit(1);
        }
    };
    let policy = matches
        .value_of(POLICY)
        .and_then(|s| ColorPolicy::from_str(s).ok())
        .unwrap_or(ColorPolicy::Percentile);

    let render = match Renderer::new(config).and_then(|r| r.render(policy)) {
        Ok(render) => render,
        Err(e) => {
            eprintln!("Render failure: {}", e);
            process::exit(1);
        }
    };

    if matches.is_present(STATS) {
        print!("{}", Report::new(&render));
    }

    let outfile = matches.value_of(OUTPUT).unwrap_or("buddha.png");
    let (width, height) = (render.grid.width(), render.grid.height());
    if let Err(e) = densitybrot::output::write_png(Path::new(outfile), render.grid.raster(), width, height) {
        eprintln!("{}", e);
        process::exit(match e {
            OutputError::Open { .. } => 2,
            _ => 3,
        });
    }
    info!("wrote {}", outfile);
}
