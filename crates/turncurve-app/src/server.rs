use rand::Rng;
use thiserror::Error;
use tiny_http::{Header, Method, Response, Server};
use tracing::{error, info, warn};

use turncurve_core::{PreparedData, SampleError, sample_chart};

use crate::chart;

const PLACEHOLDER_HTML: &str =
    "<p class=\"placeholder\">Click the button to view a random card's win rate!</p>";
const EMPTY_HTML: &str = "<p class=\"placeholder\">No cards are available: every record in the \
     table was filtered out as a basic land.</p>";
const FAILURE_HTML: &str =
    "<p class=\"placeholder\">Something went wrong while preparing the chart. Try again.</p>";

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {listen}: {message}")]
    Bind { listen: String, message: String },
}

/// Serve the viewer until the process is stopped.
///
/// One blocking accept loop, one request at a time; the prepared data is
/// read-only, so there is nothing to lock.
pub fn run(listen: &str, data: &PreparedData) -> Result<(), ServerError> {
    let server = Server::http(listen).map_err(|err| ServerError::Bind {
        listen: listen.to_string(),
        message: err.to_string(),
    })?;
    info!(listen, cards = data.dataset.card_names().len(), "viewer listening");

    let mut rng = rand::thread_rng();
    for request in server.incoming_requests() {
        let (status, body) = respond_to(data, &mut rng, request.method(), request.url());
        let response = Response::from_string(body)
            .with_status_code(status)
            .with_header(html_header());
        if let Err(err) = request.respond(response) {
            warn!(%err, "failed to deliver response");
        }
    }

    Ok(())
}

fn respond_to<R: Rng>(
    data: &PreparedData,
    rng: &mut R,
    method: &Method,
    url: &str,
) -> (u16, String) {
    if *method != Method::Get {
        return (404, not_found_page());
    }

    match url {
        "/" => (200, page(PLACEHOLDER_HTML)),
        "/random" => (200, random_page(data, rng)),
        _ => (404, not_found_page()),
    }
}

fn random_page<R: Rng>(data: &PreparedData, rng: &mut R) -> String {
    match sample_chart(&data.dataset, &data.baseline, rng) {
        Ok(spec) => match chart::render_svg(&spec) {
            Ok(svg) => {
                info!(card = %spec.card_name, turns = spec.card_points.len(), "rendered random card");
                page(&format!("<figure>{svg}</figure>"))
            }
            Err(err) => {
                error!(%err, card = %spec.card_name, "chart rendering failed");
                page(FAILURE_HTML)
            }
        },
        Err(SampleError::EmptyDataset) => page(EMPTY_HTML),
        Err(err @ SampleError::MissingBaseline { .. }) => {
            error!(%err, "baseline invariant violated");
            page(FAILURE_HTML)
        }
    }
}

fn page(content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Win Rate by Turn: Random Card Viewer</title>
<style>
  body {{ font-family: sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; }}
  .button {{ display: inline-block; padding: 0.5rem 1rem; background: #2b6cb0; color: #fff;
             text-decoration: none; border-radius: 4px; }}
  .placeholder {{ color: #555; }}
  figure {{ margin: 1.5rem 0; }}
</style>
</head>
<body>
<h1>Win Rate by Turn: Random Card Viewer</h1>
<h3>About This Tool</h3>
<p>Data comes from <a href="https://www.17lands.com">17lands</a>.</p>
<p>This tool expands on 17lands win-rate data by looking at when a permanent is in play and
reporting the observed win rate for each specific turn. For example, if a permanent is in play
on turn 4, the table records how often the player went on to win the game. The values are
observed means in the provided table, nothing stronger.</p>
<p>The <strong>red dashed line</strong> is the baseline win rate of any card on any specific
turn, while the solid line shows the win rate for a randomly selected card.</p>
<p><strong>Note</strong>: the only data included at the moment is from the
<strong>Duskmourn</strong> set.</p>
<p><a class="button" href="/random">Show Random Card</a></p>
{content}
</body>
</html>
"#
    )
}

fn not_found_page() -> String {
    page("<p class=\"placeholder\">Nothing here. The viewer lives at <a href=\"/\">/</a>.</p>")
}

fn html_header() -> Header {
    Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=utf-8"[..])
        .expect("static header is valid")
}
