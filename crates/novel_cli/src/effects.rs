use novel_client::api::NovelListQuery;
use novel_client::ApiClient;
use novel_core::{Effect, Msg};
use novel_logging::{novel_info, novel_warn};

/// Executes search effects against the backend and turns the replies back
/// into messages.
pub struct EffectRunner {
    client: ApiClient,
    listing: NovelListQuery,
}

impl EffectRunner {
    pub fn new(client: ApiClient, listing: NovelListQuery) -> Self {
        Self { client, listing }
    }

    pub async fn run(&self, effects: Vec<Effect>) -> Vec<Msg> {
        let mut replies = Vec::with_capacity(effects.len());
        for effect in effects {
            match effect {
                Effect::FetchNovels { generation } => {
                    novel_info!(
                        "FetchNovels generation={} page={} limit={}",
                        generation,
                        self.listing.page,
                        self.listing.limit
                    );
                    let result = self.client.novels().load_records(&self.listing).await;
                    if let Err(message) = &result {
                        novel_warn!("Novel listing failed: {}", message);
                    }
                    replies.push(Msg::NovelsLoaded { generation, result });
                }
            }
        }
        replies
    }
}
