//! Interactive prompt collaborator

use crate::error::Result;
use std::io::{self, Write};

/// Collects interactive input; a seam so commands can be driven by tests
pub trait Prompt {
    /// Yes/no confirmation; `false` aborts the surrounding operation
    /// cleanly
    fn confirm(&mut self, message: &str) -> Result<bool>;

    /// Free-form answer
    fn ask(&mut self, message: &str) -> Result<String>;
}

/// Prompt implementation over stdin/stdout
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn confirm(&mut self, message: &str) -> Result<bool> {
        println!("{} (y/N)", message);
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input.trim().to_lowercase().starts_with('y'))
    }

    fn ask(&mut self, message: &str) -> Result<String> {
        print!("{}: ", message);
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        Ok(input.trim().to_string())
    }
}
