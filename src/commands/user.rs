//! Account administration. Every subcommand asks for administrator
//! credentials first.

use super::{login_admin, open_app, prompt_password, prompt_profile, report_auth_error};
use crate::{
    libs::{error::AuthError, messages::Message, user::User, view::View},
    msg_error, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Debug, Subcommand)]
enum UserCommand {
    List,
    Add {
        username: String,
        /// Grant administrator rights
        #[arg(long)]
        admin: bool,
    },
    Delete {
        username: String,
    },
    /// Clear failed attempts and any lock
    Unlock {
        username: String,
    },
}

pub fn cmd(args: UserArgs) -> Result<()> {
    let mut app = open_app()?;
    let Some(admin) = login_admin(&mut app)? else {
        return Ok(());
    };

    match args.command {
        UserCommand::List => {
            let users = app.users.all();
            msg_print!(Message::UsersHeader, true);
            View::users(&users)
        }
        UserCommand::Add { username, admin } => {
            if app.users.exists(&username) {
                msg_error!(Message::UserAlreadyExists(username));
                return Ok(());
            }
            let password = prompt_password(Message::PromptPassword, true)?;
            let profile = prompt_profile()?;
            match app.users.add(User::new(&username, &password, profile, admin)) {
                Ok(()) => msg_success!(Message::UserCreated(username)),
                Err(e) if e.is_duplicate() => msg_error!(Message::UserAlreadyExists(username)),
                Err(e) => return Err(e.into()),
            }
            Ok(())
        }
        UserCommand::Delete { username } => {
            if username == admin.username() {
                msg_error!(Message::CannotDeleteSelf);
                return Ok(());
            }
            if !app.users.exists(&username) {
                msg_error!(Message::UserNotFound(username));
                return Ok(());
            }
            let confirmed = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::ConfirmDeleteUser(username.clone()).to_string())
                .default(false)
                .interact()?;
            if !confirmed {
                msg_info!(Message::OperationCancelled);
                return Ok(());
            }
            app.users.delete(&username)?;
            msg_success!(Message::UserDeleted(username));
            Ok(())
        }
        UserCommand::Unlock { username } => match app.auth().unlock(&username) {
            Ok(_) => {
                msg_success!(Message::UserUnlocked(username));
                Ok(())
            }
            Err(AuthError::InvalidCredentials) => {
                msg_error!(Message::UserNotFound(username));
                Ok(())
            }
            Err(e) => report_auth_error(e),
        },
    }
}
