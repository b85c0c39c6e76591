use std::collections::VecDeque;
use std::sync::Arc;

use anyhow::{bail, Context};
use novel_client::api::{NovelListQuery, RegisterForm};
use novel_client::{ApiClient, ClientSettings, FileSessionStore};
use novel_core::{update, ApiResponse, Msg, NovelRecord, SearchState};
use novel_logging::{novel_debug, novel_info};

use crate::cli::{Cli, Command, SearchArgs};
use crate::effects::EffectRunner;
use crate::render;

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = ClientSettings::from_env()?;
    novel_info!("Using backend {}", settings.base_url);
    let store = FileSessionStore::open(&cli.session)
        .with_context(|| format!("cannot open session file {:?}", cli.session))?;
    let client = ApiClient::new(settings, Arc::new(store))?;

    match cli.command {
        Command::Login {
            identifier,
            password,
        } => {
            let response = succeeded(client.auth().login(&identifier, &password).await)?;
            match client.auth().current_user() {
                Some(user) => println!("Signed in as {}", render::user_line(&user)),
                None => println!("{}", response.message),
            }
        }
        Command::Register {
            username,
            email,
            password,
        } => {
            let form = RegisterForm {
                username,
                email,
                password,
            };
            let response = succeeded(client.auth().register(&form).await)?;
            println!("{}", response.message);
            if let Some(pending) = client.auth().pending_verification() {
                println!("A verification code was sent to {pending}; finish with `verify <code>`.");
            }
        }
        Command::Verify { code, email } => {
            let Some(email) = email.or_else(|| client.auth().pending_verification()) else {
                bail!("no registration is waiting for verification; pass --email");
            };
            let response = succeeded(client.auth().verify_email(&email, &code).await)?;
            println!("{}", response.message);
        }
        Command::Logout => {
            client.auth().logout();
            println!("Signed out.");
        }
        Command::Whoami => whoami(&client).await,
        Command::Search(args) => search(client, &args).await?,
        Command::Novel { id } => {
            let detail = succeeded(client.novels().detail(&id).await)?;
            let payload = render::novel_payload(&detail.data).clone();
            let record: NovelRecord =
                serde_json::from_value(payload).context("unexpected novel payload")?;
            // A missing chapter list still shows the novel.
            let chapters = client.novels().chapters(&id).await;
            print!("{}", render::novel_detail(&record, &chapters.data));
        }
        Command::Chapter { novel, chapter } => {
            let response = succeeded(client.novels().chapter(&novel, &chapter).await)?;
            print!("{}", render::chapter(&response.data));
            if client.auth().is_authenticated() {
                client.users().record_reading(&novel, &chapter).await;
            }
        }
    }
    Ok(())
}

async fn whoami(client: &ApiClient) {
    if !client.auth().is_authenticated() {
        println!("Not signed in.");
        return;
    }
    // Prefer a fresh profile; the cached one is enough when offline.
    let profile = client.users().profile().await;
    let user = if profile.success {
        Some(profile.data)
    } else {
        client.auth().current_user()
    };
    match user {
        Some(user) => println!("{}", render::user_line(&user)),
        None => println!("Signed in (no profile cached)."),
    }
}

async fn search(client: ApiClient, args: &SearchArgs) -> anyhow::Result<()> {
    let listing = NovelListQuery {
        page: 1,
        limit: args.fetch,
        category: args.category.clone(),
        sort: None,
    };
    let runner = EffectRunner::new(client, listing);

    let mut msgs = args.filter_messages();
    msgs.push(Msg::Refresh);
    msgs.push(Msg::PageSelected(args.page));

    let state = drive(SearchState::with_page_size(args.page_size), msgs, &runner).await;
    let view = state.view();
    if let (Some(error), 0) = (&view.error, view.total_count) {
        bail!("{error}");
    }
    print!("{}", render::search_view(&view, args.facets));
    Ok(())
}

/// Feeds messages through `update`, running effects as they appear. Replies
/// produced by an effect are handled before the remaining queued messages.
async fn drive(mut state: SearchState, msgs: Vec<Msg>, runner: &EffectRunner) -> SearchState {
    let mut queue: VecDeque<Msg> = msgs.into();
    while let Some(msg) = queue.pop_front() {
        novel_debug!("Dispatch {}", msg_name(&msg));
        let (next, effects) = update(state, msg);
        state = next;
        let replies = runner.run(effects).await;
        for reply in replies.into_iter().rev() {
            queue.push_front(reply);
        }
    }
    state
}

fn msg_name(msg: &Msg) -> &'static str {
    match msg {
        Msg::Refresh => "Refresh",
        Msg::NovelsLoaded { .. } => "NovelsLoaded",
        Msg::KeywordChanged(_) => "KeywordChanged",
        Msg::AuthorChanged(_) => "AuthorChanged",
        Msg::StatusSelected(_) => "StatusSelected",
        Msg::WordCountBucketSelected(_) => "WordCountBucketSelected",
        Msg::TagToggled(_) => "TagToggled",
        Msg::TagsCleared => "TagsCleared",
        Msg::TagModeToggled => "TagModeToggled",
        Msg::SortKeySelected(_) => "SortKeySelected",
        Msg::SortDirectionToggled => "SortDirectionToggled",
        Msg::PageSelected(_) => "PageSelected",
        Msg::FiltersReset => "FiltersReset",
        Msg::NoOp => "NoOp",
    }
}

fn succeeded(response: ApiResponse) -> anyhow::Result<ApiResponse> {
    if response.success {
        Ok(response)
    } else if response.message.is_empty() {
        bail!("request failed")
    } else {
        bail!("{}", response.message)
    }
}
