use poise::serenity_prelude as serenity;
use tracing::debug;

use crate::commands::DispatchOutcome;
use crate::models::InboundMessage;
use crate::{Data, Error};

/// Handle incoming messages
pub async fn handle_message(
    _ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
) -> Result<(), Error> {
    let inbound = InboundMessage::from_serenity(msg);

    match data.dispatcher.dispatch(&inbound).await {
        DispatchOutcome::SelfAuthored | DispatchOutcome::NotACommand => {}
        outcome => debug!("Message {} from {}: {:?}", msg.id, msg.author.name, outcome),
    }

    Ok(())
}
