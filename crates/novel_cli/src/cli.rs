use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use novel_core::{Msg, NovelStatus, SortKey, DEFAULT_PAGE_SIZE};

use crate::logging::LogDestination;

pub const DEFAULT_SESSION_FILE: &str = ".novel_session.ron";

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse and search the novel platform from a terminal")]
pub struct Cli {
    /// Where login tokens are kept between runs.
    #[arg(long, global = true, default_value = DEFAULT_SESSION_FILE)]
    pub session: PathBuf,

    #[arg(long, global = true, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in with an email address or username.
    Login {
        identifier: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account. Most accounts need `verify` afterwards.
    Register {
        username: String,
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Confirm the emailed code. The email defaults to the pending registration.
    Verify {
        code: String,
        #[arg(long)]
        email: Option<String>,
    },
    /// Forget the stored session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Fetch novels and filter, sort and page them locally.
    Search(SearchArgs),
    /// Show one novel with its chapter list.
    Novel { id: String },
    /// Print a chapter.
    Chapter { novel: String, chapter: String },
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct SearchArgs {
    /// Matches title or description, ignoring case.
    #[arg(short, long)]
    pub keyword: Option<String>,

    #[arg(long)]
    pub author: Option<String>,

    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,

    /// Word-count range: 0 any, 1 up to 100k, 2 100k-300k, 3 300k-500k,
    /// 4 500k-1M, 5 over 1M.
    #[arg(long, default_value_t = 0)]
    pub bucket: usize,

    /// Repeat to select several tags.
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,

    /// Require every selected tag instead of any of them.
    #[arg(long)]
    pub all_tags: bool,

    #[arg(long, value_enum, default_value_t = SortArg::Updated)]
    pub sort: SortArg,

    /// Ascending order (default is descending).
    #[arg(long)]
    pub asc: bool,

    #[arg(long, default_value_t = 1)]
    pub page: usize,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// How many novels to fetch from the backend before filtering.
    #[arg(long, default_value_t = 100)]
    pub fetch: u32,

    /// Backend category to fetch from.
    #[arg(long)]
    pub category: Option<String>,

    /// Print tag counts over all fetched novels.
    #[arg(long)]
    pub facets: bool,
}

impl SearchArgs {
    /// Messages that put a fresh search state into the requested filter and
    /// sort configuration. Page selection is separate since it depends on
    /// the loaded data.
    pub fn filter_messages(&self) -> Vec<Msg> {
        let mut msgs = Vec::new();
        if let Some(keyword) = &self.keyword {
            msgs.push(Msg::KeywordChanged(keyword.clone()));
        }
        if let Some(author) = &self.author {
            msgs.push(Msg::AuthorChanged(author.clone()));
        }
        if let Some(status) = self.status {
            msgs.push(Msg::StatusSelected(Some(status.into())));
        }
        if self.bucket != 0 {
            msgs.push(Msg::WordCountBucketSelected(self.bucket));
        }
        msgs.extend(self.tags.iter().cloned().map(Msg::TagToggled));
        if self.all_tags {
            msgs.push(Msg::TagModeToggled);
        }
        if self.sort != SortArg::Updated {
            msgs.push(Msg::SortKeySelected(self.sort.into()));
        }
        if self.asc {
            msgs.push(Msg::SortDirectionToggled);
        }
        msgs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Ongoing,
    Completed,
    Paused,
}

impl From<StatusArg> for NovelStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Ongoing => NovelStatus::Ongoing,
            StatusArg::Completed => NovelStatus::Completed,
            StatusArg::Paused => NovelStatus::Paused,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Updated,
    Collections,
    Readers,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Updated => SortKey::UpdatedAt,
            SortArg::Collections => SortKey::Collections,
            SortArg::Readers => SortKey::Readers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn search(args: &[&str]) -> SearchArgs {
        let argv = ["novel_cli", "search"].iter().chain(args);
        match Cli::try_parse_from(argv).expect("valid arguments").command {
            Command::Search(search) => search,
            other => panic!("expected search, got {other:?}"),
        }
    }

    #[test]
    fn bare_search_sends_no_filter_messages() {
        let args = search(&[]);
        assert_eq!(args.page, 1);
        assert_eq!(args.page_size, DEFAULT_PAGE_SIZE);
        assert!(args.filter_messages().is_empty());
    }

    #[test]
    fn flags_become_messages_in_order() {
        let args = search(&[
            "-k",
            "星河",
            "--status",
            "completed",
            "--bucket",
            "2",
            "-t",
            "科幻",
            "-t",
            "冒险",
            "--all-tags",
            "--sort",
            "readers",
            "--asc",
        ]);
        assert_eq!(
            args.filter_messages(),
            vec![
                Msg::KeywordChanged("星河".to_string()),
                Msg::StatusSelected(Some(NovelStatus::Completed)),
                Msg::WordCountBucketSelected(2),
                Msg::TagToggled("科幻".to_string()),
                Msg::TagToggled("冒险".to_string()),
                Msg::TagModeToggled,
                Msg::SortKeySelected(SortKey::Readers),
                Msg::SortDirectionToggled,
            ]
        );
    }

    #[test]
    fn global_options_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["novel_cli", "whoami", "--session", "/tmp/s.ron", "-v"])
            .expect("valid arguments");
        assert_eq!(cli.session, PathBuf::from("/tmp/s.ron"));
        assert_eq!(cli.log_level(), LevelFilter::Debug);
        assert_eq!(cli.log, LogDestination::File);
    }

    #[test]
    fn login_requires_a_password() {
        assert!(Cli::try_parse_from(["novel_cli", "login", "lin"]).is_err());
    }
}
