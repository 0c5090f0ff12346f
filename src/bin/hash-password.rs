//! Produces the bcrypt hash for `ADMIN_PASSWORD_HASH`.
//!
//! Reads the password from the first argument, or from stdin when no
//! argument is given so it stays out of shell history.

use bcrypt::{hash, DEFAULT_COST};
use std::{env, io::BufRead};

const MIN_PASSWORD_LEN: usize = 12;

fn read_password() -> Option<String> {
    if let Some(arg) = env::args().nth(1) {
        return Some(arg);
    }
    eprintln!("Password (then Enter):");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line).ok()?;
    let line = line.trim_end_matches(['\r', '\n']).to_string();
    (!line.is_empty()).then_some(line)
}

fn main() {
    let Some(password) = read_password() else {
        eprintln!("Usage: hash-password [PASSWORD]   (or pipe the password on stdin)");
        std::process::exit(1);
    };

    if password.len() < MIN_PASSWORD_LEN {
        eprintln!("Warning: password is shorter than {MIN_PASSWORD_LEN} characters.");
    }

    match hash(&password, DEFAULT_COST) {
        Ok(hashed) => {
            // Single quotes stop .env `$` substitution from mangling the hash.
            println!("# Cost {DEFAULT_COST}. Paste this into your .env:");
            println!("ADMIN_PASSWORD_HASH='{hashed}'");
        }
        Err(e) => {
            eprintln!("Error hashing password: {e}");
            std::process::exit(1);
        }
    }
}
