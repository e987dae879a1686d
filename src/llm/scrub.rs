use std::borrow::Cow;

const MAX_API_ERROR_CHARS: usize = 200;
const REDACTED: &str = "[REDACTED]";

/// Prefixes after which everything up to the next non-token character is a
/// credential. Google API keys start with `AIza`; the others cover query
/// strings and JSON bodies echoing them back.
const SECRET_MARKERS: [&str; 5] = ["key=", "api_key=", "access_token=", "x-goog-api-key: ", "AIza"];

fn is_secret_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

fn token_end(input: &str, from: usize) -> usize {
    input[from..]
        .char_indices()
        .find(|&(_, c)| !is_secret_char(c))
        .map_or(input.len(), |(i, _)| from + i)
}

fn scrub_after_marker(scrubbed: &mut String, marker: &str) {
    // `AIza` is part of the secret itself; the other markers only precede it.
    let keep_marker = marker != "AIza";
    let mut search_from = 0;
    while let Some(rel) = scrubbed[search_from..].find(marker) {
        let start = search_from + rel;
        let content_start = start + marker.len();
        let end = token_end(scrubbed, content_start);

        if end == content_start {
            search_from = content_start;
            continue;
        }

        let replace_from = if keep_marker { content_start } else { start };
        scrubbed.replace_range(replace_from..end, REDACTED);
        search_from = replace_from + REDACTED.len();
    }
}

/// Redact credentials that may appear in provider errors or request URLs.
pub fn scrub_secret_patterns(input: &str) -> Cow<'_, str> {
    if !SECRET_MARKERS.iter().any(|marker| input.contains(marker)) {
        return Cow::Borrowed(input);
    }

    let mut scrubbed = input.to_string();
    for marker in SECRET_MARKERS {
        scrub_after_marker(&mut scrubbed, marker);
    }
    Cow::Owned(scrubbed)
}

/// Scrub and cap an error body before it reaches the user.
pub fn sanitize_api_error(input: &str) -> String {
    let scrubbed = scrub_secret_patterns(input.trim());
    match scrubbed.char_indices().nth(MAX_API_ERROR_CHARS) {
        Some((cut, _)) => format!("{}...", &scrubbed[..cut]),
        None => scrubbed.into_owned(),
    }
}
