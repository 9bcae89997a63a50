use std::io::Write;
use std::path::Path;

use anyhow::{anyhow, bail, Context};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm as Prompt};
use ink_controller::{
    BlogConfig, ClickTarget, CommentForm, Confirm, Controller, Effect, Location, PostForm,
};
use ink_store::{FileKeyValueStore, KeyValueStore};
use tracing::debug;

use crate::cli::*;
use crate::terminal::Terminal;

/// Navigations followed before giving up on a redirect loop.
const MAX_REDIRECTS: usize = 4;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    if let Command::Config = cli.command {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let backend = FileKeyValueStore::open(&cli.store)
        .with_context(|| format!("opening store {}", cli.store.display()))?;
    let mut session = Session::new(Controller::new(backend, config), Terminal::stdio(cli.format));

    match cli.command {
        Command::Open(args) => session.open(&args.location),
        Command::List => session.list(),
        Command::Show(args) => session.show(&args.id),
        Command::Create(args) => session.create(args),
        Command::Comment(args) => session.comment(args),
        Command::Delete(args) if args.yes => session.delete(&args.id, &mut |_: &str| true),
        Command::Delete(args) => session.delete(&args.id, &mut prompt),
        Command::Sweep(args) => session.sweep(args.dry_run),
        Command::Config => Ok(()),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<BlogConfig> {
    match path {
        Some(path) => Ok(BlogConfig::load(path)?),
        None => Ok(BlogConfig::default()),
    }
}

fn prompt(message: &str) -> bool {
    Prompt::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .default(false)
        .interact()
        .unwrap_or(false)
}

/// One command run: a controller and the terminal its effects go to.
pub struct Session<S, O, E> {
    controller: Controller<S>,
    terminal: Terminal<O, E>,
}

impl<S: KeyValueStore, O: Write, E: Write> Session<S, O, E> {
    pub fn new(controller: Controller<S>, terminal: Terminal<O, E>) -> Self {
        Self { controller, terminal }
    }

    /// Load the page at `href` and follow any redirects it issues.
    pub fn open(&mut self, href: &str) -> anyhow::Result<()> {
        let mut href = href.to_string();
        for _ in 0..=MAX_REDIRECTS {
            let location = Location::parse(&href)?;
            let load = self.controller.load(&location)?;
            if load.page.is_none() {
                bail!("{href} is not an Inkpost page");
            }
            match self.terminal.apply(&load.effects)? {
                Some(next) => {
                    debug!(from = %href, to = %next, "following navigation");
                    href = next;
                }
                None => return Ok(()),
            }
        }
        Err(anyhow!("too many redirects, last location {href}"))
    }

    pub fn list(&mut self) -> anyhow::Result<()> {
        let href = self.controller.config().routes.list.clone();
        self.open(&href)
    }

    pub fn show(&mut self, id: &str) -> anyhow::Result<()> {
        let href = self.detail_href(id);
        self.open(&href)
    }

    pub fn create(&mut self, args: CreateArgs) -> anyhow::Result<()> {
        let form = PostForm {
            title: args.title,
            content: args.content,
            image: args.image,
        };
        let effects = self.controller.create_post(&form)?;
        self.follow(&effects)
    }

    pub fn comment(&mut self, args: CommentArgs) -> anyhow::Result<()> {
        let location = Location::parse(&self.detail_href(&args.id))?;
        let form = CommentForm {
            author: args.author,
            text: args.text,
        };
        let effects = self.controller.add_comment(&location, &form)?;
        self.follow(&effects)
    }

    pub fn delete(&mut self, id: &str, confirm: &mut dyn Confirm) -> anyhow::Result<()> {
        let effects = self
            .controller
            .delete_post(&ClickTarget::delete_control(id), confirm)?;
        if effects.is_empty() {
            writeln!(self.terminal.out(), "Nothing deleted.")?;
            return Ok(());
        }
        self.follow(&effects)
    }

    pub fn sweep(&mut self, dry_run: bool) -> anyhow::Result<()> {
        let store = self.controller.store();
        if dry_run {
            let orphans = store.orphaned_comment_keys()?;
            let out = self.terminal.out();
            for id in &orphans {
                writeln!(out, "  {} comments of post {}", "orphaned:".yellow(), id)?;
            }
            writeln!(out, "{} orphaned collection(s) found.", orphans.len())?;
        } else {
            let removed = store.sweep_orphaned_comments()?;
            writeln!(
                self.terminal.out(),
                "{} Swept {} orphaned collection(s).",
                "✓".green(),
                removed
            )?;
        }
        Ok(())
    }

    /// Apply handler effects, loading the target page on navigation.
    fn follow(&mut self, effects: &[Effect]) -> anyhow::Result<()> {
        match self.terminal.apply(effects)? {
            Some(next) => self.open(&next),
            None => Ok(()),
        }
    }

    fn detail_href(&self, id: &str) -> String {
        format!("{}?id={}", self.controller.config().routes.detail, id.trim())
    }

    #[cfg(test)]
    fn into_output(self) -> (String, String)
    where
        O: AsRef<[u8]>,
        E: AsRef<[u8]>,
    {
        let (out, err) = self.terminal.into_parts();
        (lossy(out), lossy(err))
    }
}

#[cfg(test)]
fn lossy(bytes: impl AsRef<[u8]>) -> String {
    String::from_utf8_lossy(bytes.as_ref()).into_owned()
}
