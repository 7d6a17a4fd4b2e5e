//! Shared entry point of the `meshthumb` binaries
use std::path::PathBuf;
use std::time::Instant;

use meshthumb_core::Normalization;

use crate::error::RenderError;
use crate::pipeline::Pipeline;

/// Split the command line into input and output paths.
pub fn parse_args<I>(args: I) -> Result<(PathBuf, PathBuf), RenderError>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    match <[String; 2]>::try_from(args) {
        Ok([input, output]) => Ok((PathBuf::from(input), PathBuf::from(output))),
        Err(args) => Err(RenderError::Usage(args.len())),
    }
}

/// Render `args[0]` into the PNG `args[1]`, printing pass statistics.
pub fn run<I>(args: I, normalization: Normalization) -> Result<(), RenderError>
where
    I: IntoIterator<Item = String>,
{
    let (input, output) = parse_args(args)?;
    let pipeline = Pipeline::for_input(&input, normalization);
    log::debug!("using {:?} preset", pipeline.config().preset);

    let start = Instant::now();
    let stats = pipeline.run(&input, &output)?;
    println!("{stats}");
    println!("{:?}", stats.duration);
    log::debug!("total {:?}", start.elapsed());
    Ok(())
}

/// Run and turn any failure into a message and exit status 1
pub fn main_with(program: &str, normalization: Normalization) {
    crate::logger::init();
    if let Err(err) = run(std::env::args().skip(1), normalization) {
        match err {
            RenderError::Usage(_) => eprintln!("Usage: {program} input.stl output.png"),
            other => log::error!("{other}"),
        }
        std::process::exit(1);
    }
}
