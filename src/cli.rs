// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2026 Michael Dippery <michael@monkey-robot.com>

//! Drives the interactive command-line program.

use crate::ai::Auth;
use crate::ai::client::groq::{GroqClient, GroqRequest};
use crate::ai::client::{self, APIClient};
use crate::bot::Bot;
use crate::clock::{Clock, SystemClock};
use crate::conf::{self, Credentials};
use crate::reddit::{RedditService, Service};
use crate::schedule::{PostTime, ScheduledPost, Scheduler};
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use indoc::indoc;
use log::{debug, info};
use std::io::{self, BufRead, Write};
use std::num::ParseIntError;
use thiserror::Error;

const WELCOME: &str = "Welcome to the Reddit Bot!";
const MENU: &str = indoc! {"
    Choose an option:
    1. Post content
    2. Comment on posts
    Enter your choice (1 or 2): "};
const TOPIC_PROMPT: &str = "Enter the topic: ";
const TIME_PROMPT: &str = "Enter the time to post (in HH:MM 24-hour format, e.g., 14:30): ";
const SUBREDDIT_PROMPT: &str = "Enter the subreddit name to comment on: ";
const COUNT_PROMPT: &str = "Enter the number of posts to comment on: ";
const INVALID_TIME: &str = "Invalid time format. Please enter the time in HH:MM 24-hour format.";

/// Program configuration.
#[derive(Debug, Parser)]
#[command(version)]
#[command(about = "Writes Reddit posts and comments with an LLM", long_about = None)]
pub struct Config {
    #[command(flatten)]
    verbosity: Verbosity,
}

impl Config {
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }
}

/// An error that ends the program.
#[derive(Debug, Error)]
pub enum Error {
    /// The number of posts to comment on was not a non-negative integer.
    #[error("invalid number of posts {input:?}: {source}")]
    InvalidCount { input: String, source: ParseIntError },

    /// The terminal could not be read from or written to.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The article to post could not be written.
    #[error("could not write article: {0}")]
    Generation(#[from] client::Error),
}

/// What the operator asked the bot to do.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mode {
    /// Write an article and post it at a scheduled time.
    Post,

    /// Comment on a subreddit's hot posts.
    Comment,
}

impl Mode {
    /// Maps a menu choice to a mode. Anything but "1" or "2" is no mode.
    pub fn from_choice(choice: &str) -> Option<Mode> {
        match choice {
            "1" => Some(Mode::Post),
            "2" => Some(Mode::Comment),
            _ => None,
        }
    }
}

/// Asks the operator questions and reads the answers.
#[derive(Debug)]
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints a line of text.
    pub fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{message}")
    }

    /// Prints `prompt` and returns the next line of input with
    /// surrounding whitespace removed.
    ///
    /// Running out of input is an error.
    pub fn ask(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no answer given",
            ));
        }
        Ok(answer.trim().to_string())
    }

    /// Everything written so far.
    pub fn output(&self) -> &W {
        &self.output
    }
}

/// Runs the program.
#[derive(Debug)]
pub struct Runner<S = RedditService, C = GroqClient, K = SystemClock> {
    bot: Bot<S, C>,
    scheduler: Scheduler<K>,
}

impl Runner {
    /// Creates a runner configured from the environment.
    ///
    /// Missing credentials are logged but are not an error here; Reddit or
    /// Groq will refuse them when they are first used.
    pub fn from_env() -> Self {
        let credentials = Credentials::from_env();
        let auth = Auth::from_env_or_empty(conf::GROQ_API_KEY_VAR);
        Self::new(Bot::new(credentials, auth), Scheduler::new())
    }
}

impl<S, C, K> Runner<S, C, K>
where
    S: Service,
    C: APIClient<APIRequest = GroqRequest>,
    K: Clock,
{
    pub fn new(bot: Bot<S, C>, scheduler: Scheduler<K>) -> Self {
        Self { bot, scheduler }
    }

    /// Shows the menu and runs whichever workflow the operator picks.
    ///
    /// Scheduling a post never returns.
    pub async fn run<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<(), Error> {
        prompter.say(WELCOME)?;
        let choice = prompter.ask(MENU)?;
        match Mode::from_choice(&choice) {
            Some(Mode::Post) => self.run_post(prompter).await,
            Some(Mode::Comment) => self.run_comment(prompter).await,
            None => {
                debug!("nothing to do for menu choice {choice:?}");
                Ok(())
            }
        }
    }

    async fn run_post<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<(), Error> {
        let topic = prompter.ask(TOPIC_PROMPT)?;
        // The article is written before the time is asked for, so a bad
        // time still costs a completion.
        let content = self.bot.writer().article(&topic).await?;
        let time = prompter.ask(TIME_PROMPT)?;

        match PostTime::parse(&time) {
            Ok(at) => {
                let post = ScheduledPost::new(at, topic, content);
                self.bot.schedule_post(&self.scheduler, &post).await;
                Ok(())
            }
            Err(err) => {
                debug!("{err}");
                prompter.say(INVALID_TIME)?;
                Ok(())
            }
        }
    }

    async fn run_comment<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<(), Error> {
        let subreddit = prompter.ask(SUBREDDIT_PROMPT)?;
        let input = prompter.ask(COUNT_PROMPT)?;
        let num_posts = match input.parse::<usize>() {
            Ok(n) => n,
            Err(source) => return Err(Error::InvalidCount { input, source }),
        };

        let report = self.bot.comment_on_posts(&subreddit, num_posts).await;
        info!("finished commenting on r/{subreddit}: {report:?}");
        Ok(())
    }
}
