use std::path::Path;
use std::time::Duration;

use tracing::debug;

use crate::models::ReviewRequest;
use crate::system::process::run_command;

/// `gh` talks to the network, so it gets a longer budget than git.
pub const GH_TIMEOUT: Duration = Duration::from_secs(10);

/// Open pull requests for the repository at `path`. Empty on any failure.
pub async fn list_review_requests(path: &Path, timeout: Duration) -> Vec<ReviewRequest> {
    let outcome = run_command(
        "gh",
        &["pr", "list", "--json", "number,title,headRefName,url"],
        Some(path),
        timeout,
    )
    .await;
    match outcome.output() {
        Some(json) => parse_review_requests(json),
        None => Vec::new(),
    }
}

/// Decode `gh pr list --json number,title,headRefName,url` output.
pub fn parse_review_requests(json: &str) -> Vec<ReviewRequest> {
    match serde_json::from_str(json) {
        Ok(list) => list,
        Err(err) => {
            debug!(%err, "unexpected gh pr list output");
            Vec::new()
        }
    }
}

/// Open the repository's pull request list in the browser.
pub async fn open_review_requests_in_browser(path: &Path, timeout: Duration) -> bool {
    run_command("gh", &["pr", "list", "--web"], Some(path), timeout)
        .await
        .ok
}
