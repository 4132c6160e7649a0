use clap::{Parser, Subcommand};
use quire_core::db::DEFAULT_DATABASE_URL;
use quire_core::models::Role;

#[derive(Parser, Debug)]
#[command(name = "quire", version, about = "Quire administration CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the CLI version.
    Version,

    /// Create the database if needed and apply pending migrations.
    Migrate {
        #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
        database_url: String,
    },

    /// Set the role of an existing user (bootstraps the first admin).
    Promote {
        #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
        database_url: String,

        /// Username of the account to change.
        #[arg(long)]
        username: String,

        /// Role to assign.
        #[arg(long, default_value_t = Role::Admin)]
        role: Role,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promote_defaults_to_admin() {
        let cli = Cli::try_parse_from(["quire", "promote", "--username", "alice"]).unwrap();
        match cli.command {
            Commands::Promote { username, role, .. } => {
                assert_eq!(username, "alice");
                assert_eq!(role, Role::Admin);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn promote_rejects_unknown_role() {
        let result = Cli::try_parse_from([
            "quire",
            "promote",
            "--username",
            "alice",
            "--role",
            "owner",
        ]);
        assert!(result.is_err());
    }
}
