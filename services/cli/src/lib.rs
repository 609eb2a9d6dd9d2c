mod cli;
mod demo;
mod infra;
mod render;

use dealscope::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
