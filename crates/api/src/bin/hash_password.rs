//! Print an Argon2id hash for a password, for use in the users file.
//!
//! ```text
//! westeros-hash-password 'correct horse'
//! echo 'correct horse' | westeros-hash-password
//! ```

use std::io::BufRead;

use anyhow::Context;
use westeros_api::auth::password::hash_password;

fn main() -> anyhow::Result<()> {
    let password = match std::env::args().nth(1) {
        Some(arg) => arg,
        None => {
            let mut line = String::new();
            std::io::stdin()
                .lock()
                .read_line(&mut line)
                .context("Failed to read password from stdin")?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    anyhow::ensure!(!password.is_empty(), "Password must not be empty");

    let hash = hash_password(&password).map_err(|e| anyhow::anyhow!("Hashing failed: {e}"))?;
    println!("{hash}");
    Ok(())
}
