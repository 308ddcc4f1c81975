use super::{open_app, prompt_password, prompt_text, report_auth_error};
use crate::{
    libs::{formatter, messages::Message},
    msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account to log in with; prompted for when omitted
    username: Option<String>,
}

pub fn cmd(args: LoginArgs) -> Result<()> {
    let mut app = open_app()?;
    let username = match args.username {
        Some(username) => username,
        None => prompt_text(Message::PromptUsername, None)?,
    };
    let password = prompt_password(Message::PromptPassword, false)?;

    let previous = app.users.get(&username).and_then(|user| user.last_login());
    match app.auth().login(&username, &password) {
        Ok(user) => {
            msg_success!(Message::LoginSuccess(user.profile.full_name.clone()));
            if previous.is_some() {
                msg_info!(Message::LastLogin(formatter::display_timestamp(previous.as_ref())));
            }
            Ok(())
        }
        Err(e) => report_auth_error(e),
    }
}
