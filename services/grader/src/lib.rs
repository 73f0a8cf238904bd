mod cli;
mod infra;
mod report;

use tilawah_score::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
