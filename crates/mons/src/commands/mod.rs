// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod add;
pub mod list;
pub mod search;
pub mod update;

use std::sync::Arc;

use libmons::{ApiClient, CatalogIndex, Prompter, Result, Session, Unattended};

use crate::{
    cli_config::CliConfig, output::Verbosity, progress::DownloadProgress,
    prompt::TerminalPrompter,
};

/// global options shared by every command.
pub struct Context<'a> {
    pub config: &'a CliConfig,
    pub install: Option<&'a str>,
    pub json: bool,
    pub verbosity: Verbosity,
    pub assume_yes: bool,
}

impl Context<'_> {
    /// json output never reads from the terminal.
    pub fn prompter(&self) -> Box<dyn Prompter> {
        if self.json {
            Box::new(Unattended::new(self.assume_yes))
        } else {
            Box::new(TerminalPrompter::new(self.assume_yes))
        }
    }

    /// fetches the catalog for the selected install.
    pub fn open_session(&self) -> Result<(Session, ApiClient)> {
        let install = self.config.install(self.install)?;
        let mut client = ApiClient::new(&self.config.inner)?;
        if self.shows_progress() {
            client = client.with_progress(Arc::new(DownloadProgress::default()));
        }
        let session = Session::open(self.config.inner.clone(), install, &client)?;
        log::debug!(target: "catalog", "{} catalog entries", session.catalog.len());
        Ok((session, client))
    }

    fn shows_progress(&self) -> bool {
        !self.json && self.verbosity != Verbosity::Quiet
    }

    /// a session for commands that only look at the local install.
    pub fn local_session(&self) -> Result<Session> {
        let install = self.config.install(self.install)?;
        Ok(Session::with_catalog(
            self.config.inner.clone(),
            install,
            CatalogIndex::default(),
        ))
    }
}
