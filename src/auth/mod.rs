//! Interactive credential setup and removal.

use std::error::Error;
use std::io::{self, Write};

use crate::core::credential::{CredentialError, CredentialStore};

/// Prompts for an API token and saves it, overwriting any previous one.
pub fn interactive_auth(store: &dyn CredentialStore) -> Result<(), Box<dyn Error>> {
    println!("Mason authentication setup");
    println!();
    if store.load()?.is_some() {
        println!("A token is already stored; saving a new one will overwrite it.");
    }

    print!("Enter your API token: ");
    io::stdout().flush()?;
    let mut token = String::new();
    io::stdin().read_line(&mut token)?;

    match store.store(&token) {
        Ok(()) => {
            println!("Token saved.");
            Ok(())
        }
        Err(CredentialError::Empty) => Err(Box::new(CredentialError::Empty)),
        Err(err) => Err(Box::new(err)),
    }
}

/// Removes the stored API token after confirmation. Safe to run when no
/// token is stored.
pub fn interactive_deauth(store: &dyn CredentialStore) -> Result<(), Box<dyn Error>> {
    if store.load()?.is_none() {
        println!("No API token is stored.");
        return Ok(());
    }

    print!("Remove the stored API token? [y/N]: ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;

    if answer.trim().eq_ignore_ascii_case("y") {
        store.clear()?;
        println!("Token removed.");
    } else {
        println!("Canceled.");
    }
    Ok(())
}
