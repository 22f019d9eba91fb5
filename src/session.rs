//! Session state: the forum client and the currently selected class

use tracing::{debug, info};

use crate::classes::{render_class_list, render_class_selected};
use crate::client::ForumClient;
use crate::error::{Error, Result};
use crate::feed::{search_posts, FeedQuery};
use crate::markdown::render_post;

/// Holds the client and the selected class for the lifetime of the process.
/// The renderers never see it; they get plain records.
pub struct Session<C> {
    client: C,
    network: Option<String>,
}

impl<C: ForumClient> Session<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            network: None,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// The selected class, or `NoClassSelected`
    pub fn network(&self) -> Result<&str> {
        self.network.as_deref().ok_or(Error::NoClassSelected)
    }

    pub fn list_classes(&self) -> Result<String> {
        let status = self.client.user_status()?;
        Ok(render_class_list(&status.networks))
    }

    /// Select the class every later search or post lookup runs against
    pub fn set_class(&mut self, network_id: &str) -> Result<String> {
        let status = self.client.user_status()?;
        let class = status
            .networks
            .iter()
            .find(|c| c.id == network_id)
            .ok_or_else(|| Error::UnknownNetwork(network_id.to_string()))?;

        info!(network_id, "class selected");
        self.network = Some(network_id.to_string());
        Ok(render_class_selected(class))
    }

    pub fn search_posts(&self, query: &FeedQuery) -> Result<String> {
        let network = self.network()?;
        debug!(network, ?query, "search");
        search_posts(&self.client, network, query)
    }

    pub fn get_post(&self, nr: u64) -> Result<String> {
        let network = self.network()?;
        debug!(network, nr, "get post");
        let post = self.client.post(network, nr)?;
        Ok(render_post(&post))
    }
}
