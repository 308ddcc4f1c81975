//! Configuration initialization command.

use crate::{
    libs::{app::App, config::Config, messages::Message},
    msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Save the default configuration without prompting
    #[arg(short, long)]
    defaults: bool,
}

pub fn cmd(init_args: InitArgs) -> Result<()> {
    let config = if init_args.defaults { Config::default() } else { Config::init()? };
    config.save()?;

    // Opening the collections once seeds the administrator account.
    App::from_config(&config)?;

    if init_args.defaults {
        msg_success!(Message::ConfigDefaultsSaved);
    } else {
        msg_success!(Message::ConfigSaved);
    }
    Ok(())
}
