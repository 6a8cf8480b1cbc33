use anyhow::Result;
use log::{debug, info, warn};

use crate::callerid::{parse_caller_id, CallerIdentity};
use crate::client::{CdrItem, VoipClient};
use crate::config::{DateWindow, MIN_DURATION};

/// Answered calls to `phone_number` in `window`, as caller identities in
/// response order. A non-success status from the provider means "no calls".
pub async fn fetch_callers(
    client: &VoipClient,
    window: &DateWindow,
    phone_number: &str,
) -> Result<(usize, Vec<CallerIdentity>)> {
    info!("Fetching answered calls from {} to {}...", window.from, window.to);

    let response = client.get_cdrs(window).await?;
    if !response.is_success() {
        warn!("getCDR returned status '{}', treating as no calls", response.status);
        return Ok((0, Vec::new()));
    }

    let cdrs = response.payload.cdr;
    let callers = extract_callers(&cdrs, phone_number);
    info!(
        "Found {} qualifying callers in {} call records",
        callers.len(),
        cdrs.len()
    );
    Ok((cdrs.len(), callers))
}

/// Duration is `HH:MM:SS`, zero padded, so string order is time order.
fn meets_min_duration(duration: &str) -> bool {
    duration >= MIN_DURATION
}

pub fn extract_callers(cdrs: &[CdrItem], phone_number: &str) -> Vec<CallerIdentity> {
    let mut callers = Vec::new();

    for cdr in cdrs {
        if cdr.destination != phone_number || !meets_min_duration(&cdr.duration) {
            continue;
        }

        match parse_caller_id(&cdr.callerid) {
            Some(caller) => callers.push(caller),
            // No fallback to the destination: it is always our own number.
            None => debug!("Skipping call with unusable caller id '{}'", cdr.callerid),
        }
    }

    callers
}
