//! Block explorer client (Etherscan-compatible `account` module).

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::blockchain::{ChainError, ChainResult};
use crate::config::ExplorerConfig;

/// Which transaction list to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionList {
    /// Native value transfers and contract calls (`txlist`).
    Native,
    /// ERC-20 transfer events (`tokentx`).
    Token,
}

impl TransactionList {
    fn action(&self) -> &'static str {
        match self {
            TransactionList::Native => "txlist",
            TransactionList::Token => "tokentx",
        }
    }
}

/// One transaction as reported by the explorer. Values are kept as the
/// explorer's decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorerTransaction {
    pub hash: String,
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default)]
    pub time_stamp: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub gas_used: Option<String>,
    #[serde(default)]
    pub is_error: Option<String>,
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub token_symbol: Option<String>,
    #[serde(default)]
    pub token_decimal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExplorerEnvelope {
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: Option<ExplorerResult>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExplorerResult {
    Transactions(Vec<ExplorerTransaction>),
    Message(String),
}

#[derive(Debug, Clone)]
pub struct ExplorerClient {
    http: Client,
    api_url: String,
}

impl ExplorerClient {
    pub fn new(config: &ExplorerConfig) -> ChainResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ChainError::Explorer(format!("failed to build http client: {}", e)))?;

        Ok(Self {
            http,
            api_url: format!("{}/api", config.base_url.trim_end_matches('/')),
        })
    }

    /// Newest-first transactions touching `address`, at most `limit` of them.
    ///
    /// An explorer that has nothing for the address yields an empty list.
    pub async fn latest(
        &self,
        list: TransactionList,
        address: &str,
        limit: usize,
    ) -> ChainResult<Vec<ExplorerTransaction>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let offset = limit.to_string();
        let response = self
            .http
            .get(&self.api_url)
            .query(&[
                ("module", "account"),
                ("action", list.action()),
                ("address", address),
                ("sort", "desc"),
                ("page", "1"),
                ("offset", offset.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ChainError::Explorer(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChainError::Explorer(format!("explorer returned status {}", status)));
        }

        let envelope: ExplorerEnvelope = response
            .json()
            .await
            .map_err(|e| ChainError::Explorer(format!("invalid response body: {}", e)))?;

        match envelope.result {
            Some(ExplorerResult::Transactions(mut transactions)) => {
                transactions.truncate(limit);
                tracing::debug!(address, action = list.action(), count = transactions.len(), "Explorer transactions fetched");
                Ok(transactions)
            }
            None => Ok(Vec::new()),
            Some(ExplorerResult::Message(_)) if envelope.message.starts_with("No transactions found") => {
                Ok(Vec::new())
            }
            Some(ExplorerResult::Message(detail)) => Err(ChainError::Explorer(format!(
                "{}: {}",
                envelope.message, detail
            ))),
        }
    }
}
