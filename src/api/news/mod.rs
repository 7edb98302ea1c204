use crate::error::NexusError;
use crate::state::NewsItem;
use reqwest::Client;
use serde::Deserialize;

const HN_SEARCH_URL: &str = "https://hn.algolia.com/api/v1/search?tags=front_page";
const MAX_HEADLINES: usize = 10;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    title: String,
    author: String,
}

pub async fn fetch_headlines(client: &Client) -> Result<Vec<NewsItem>, NexusError> {
    let response = client.get(HN_SEARCH_URL).send().await?;

    if !response.status().is_success() {
        return Err(NexusError::BadStatus("Hacker News", response.status()));
    }

    let body: SearchResponse = response.json().await?;
    Ok(body
        .hits
        .into_iter()
        .take(MAX_HEADLINES)
        .map(|hit| NewsItem {
            title: hit.title,
            source: hit.author,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_response_parses_and_truncates() {
        let hits: Vec<String> = (0..15)
            .map(|i| format!(r#"{{"title":"Story {}","author":"user{}"}}"#, i, i))
            .collect();
        let json = format!(r#"{{"hits":[{}]}}"#, hits.join(","));

        let body: SearchResponse = serde_json::from_str(&json).unwrap();
        let items: Vec<NewsItem> = body
            .hits
            .into_iter()
            .take(MAX_HEADLINES)
            .map(|hit| NewsItem {
                title: hit.title,
                source: hit.author,
            })
            .collect();

        assert_eq!(items.len(), MAX_HEADLINES);
        assert_eq!(items[0].title, "Story 0");
        assert_eq!(items[0].source, "user0");
    }
}
