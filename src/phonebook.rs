use anyhow::{bail, Result};
use log::{debug, info, warn};
use std::collections::HashSet;

use crate::callerid::CallerIdentity;
use crate::client::VoipClient;
use crate::config::AUTO_WHITE_GROUP;

/// Numbers already stored in the account's phonebook.
///
/// Unlike the CDR fetch, a failure here is fatal: without an accurate
/// baseline every caller would be re-added.
pub async fn fetch_phonebook_numbers(client: &VoipClient) -> Result<HashSet<String>> {
    let response = client.get_phonebook().await?;
    if !response.is_success() {
        bail!("Unable to get phonebook: status '{}'", response.status);
    }

    let numbers: HashSet<String> = response
        .payload
        .phonebooks
        .into_iter()
        .map(|entry| entry.number)
        .collect();
    info!("Phonebook holds {} numbers", numbers.len());
    Ok(numbers)
}

/// Outcome of looking up, and if needed creating, the auto_white group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupResolution {
    Existing(String),
    Created(String),
    /// Creation was attempted but the group still cannot be found.
    Unresolvable,
}

impl GroupResolution {
    pub fn id(&self) -> Option<&str> {
        match self {
            GroupResolution::Existing(id) | GroupResolution::Created(id) => Some(id),
            GroupResolution::Unresolvable => None,
        }
    }
}

pub async fn find_group(client: &VoipClient) -> Result<Option<String>> {
    let response = client.get_phonebook_groups(AUTO_WHITE_GROUP).await?;
    if !response.is_success() {
        debug!("getPhonebookGroups returned status '{}'", response.status);
        return Ok(None);
    }

    Ok(response
        .payload
        .phonebook_groups
        .into_iter()
        .find(|group| group.name == AUTO_WHITE_GROUP)
        .map(|group| group.phonebook_group))
}

/// Looks the group up, creating it only when absent. The provider has no
/// atomic create-or-get, so the re-query after creation is authoritative.
pub async fn resolve_group(client: &VoipClient) -> Result<GroupResolution> {
    if let Some(id) = find_group(client).await? {
        debug!("Using existing group '{AUTO_WHITE_GROUP}' ({id})");
        return Ok(GroupResolution::Existing(id));
    }

    info!("Creating phonebook group '{AUTO_WHITE_GROUP}'");
    let created = client.set_phonebook_group(AUTO_WHITE_GROUP).await?;
    if !created.is_success() {
        warn!("setPhonebookGroup returned status '{}'", created.status);
    }

    Ok(match find_group(client).await? {
        Some(id) => GroupResolution::Created(id),
        None => GroupResolution::Unresolvable,
    })
}

#[derive(Debug, Default)]
pub struct WriteSummary {
    pub added: usize,
    pub already_known: usize,
    pub group: Option<GroupResolution>,
}

/// Adds every caller not in `known` to the auto_white group, in order.
///
/// `known` is a snapshot taken before any write; changes made to the
/// phonebook by others during the run are not seen. The group is resolved
/// on the first insertion only, and the first failed write aborts the run.
pub async fn add_missing_callers(
    client: &VoipClient,
    callers: &[CallerIdentity],
    mut known: HashSet<String>,
) -> Result<WriteSummary> {
    let mut summary = WriteSummary::default();
    let mut resolution: Option<GroupResolution> = None;

    for caller in callers {
        if !known.insert(caller.number.clone()) {
            summary.already_known += 1;
            continue;
        }

        if resolution.is_none() {
            resolution = Some(resolve_group(client).await?);
        }
        let Some(group) = resolution.as_ref().and_then(GroupResolution::id) else {
            bail!("Unable to find or create phonebook group '{AUTO_WHITE_GROUP}'");
        };

        let name = caller.display_name();
        let response = client.set_phonebook(name, &caller.number, group).await?;
        if !response.is_success() {
            bail!(
                "Update phone failed for {name} {} (group {group}): status '{}'",
                caller.number,
                response.status
            );
        }

        info!("Added {name} ({}) to '{AUTO_WHITE_GROUP}'", caller.number);
        summary.added += 1;
    }

    summary.group = resolution;
    Ok(summary)
}
