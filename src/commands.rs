//! Chat command parsing and dispatch

use crate::config::{CommandsConfig, ReplyScope};
use crate::logging::{StructuredLogger, get_logger};
use crate::poller::CommandHandler;
use crate::scheduler::ScheduleCoordinator;
use std::sync::Arc;

/// Commands understood by the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Price,
    Today,
    Tomorrow,
    Help,
    Update,
}

impl Command {
    pub const ALL: [Command; 5] = [
        Command::Price,
        Command::Today,
        Command::Tomorrow,
        Command::Help,
        Command::Update,
    ];

    /// Portuguese name and English alias, without the slash
    pub fn names(self) -> (&'static str, &'static str) {
        match self {
            Command::Price => ("preco", "price"),
            Command::Today => ("hoje", "today"),
            Command::Tomorrow => ("amanha", "tomorrow"),
            Command::Help => ("ajuda", "help"),
            Command::Update => ("atualizar", "update"),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Command::Price => "preço da hora atual",
            Command::Today => "preços de hoje",
            Command::Tomorrow => "preços de amanhã",
            Command::Help => "esta mensagem",
            Command::Update => "descarregar novamente o ficheiro de preços",
        }
    }

    /// Parse message text; anything unrecognised yields `None`.
    ///
    /// Matching is case-insensitive, ignores surrounding whitespace and
    /// accepts a `@botname` suffix on the command word.
    pub fn parse(text: &str) -> Option<Self> {
        let normalized = text.trim().to_lowercase();
        let word = normalized.strip_prefix('/')?;
        let word = word.split('@').next().unwrap_or(word);
        Self::ALL.into_iter().find(|c| {
            let (pt, en) = c.names();
            word == pt || word == en
        })
    }
}

/// Routes parsed commands to the coordinator
pub struct CommandRouter {
    coordinator: Arc<ScheduleCoordinator>,
    policy: CommandsConfig,
    logger: StructuredLogger,
}

impl CommandRouter {
    pub fn new(coordinator: Arc<ScheduleCoordinator>, policy: CommandsConfig) -> Self {
        Self {
            coordinator,
            policy,
            logger: get_logger("commands"),
        }
    }

    /// Execute the command in `text` on behalf of `chat_id`.
    ///
    /// Returns the command that ran, if any.
    pub async fn dispatch(&self, text: &str, chat_id: &str) -> Option<Command> {
        let Some(command) = Command::parse(text) else {
            self.logger
                .for_chat(chat_id)
                .trace("Ignoring non-command message");
            return None;
        };
        self.logger
            .for_chat(chat_id)
            .info(&format!("Received /{}", command.names().0));

        let origin = [chat_id.to_string()];
        let origin: &[String] = &origin;
        let scoped = |scope: ReplyScope| match scope {
            ReplyScope::Origin => Some(origin),
            ReplyScope::Broadcast => None,
        };

        match command {
            Command::Price => {
                self.coordinator
                    .hourly_check(scoped(self.policy.price_reply))
                    .await
            }
            Command::Today => self.coordinator.send_day_prices(0, Some(origin)).await,
            Command::Tomorrow => self.coordinator.send_day_prices(1, Some(origin)).await,
            Command::Help => self.coordinator.send_help(Some(origin)).await,
            Command::Update => {
                self.coordinator
                    .daily_refresh(scoped(self.policy.update_reply))
                    .await
            }
        }
        Some(command)
    }
}

#[async_trait::async_trait]
impl CommandHandler for CommandRouter {
    async fn handle(&self, text: &str, chat_id: &str) {
        self.dispatch(text, chat_id).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_languages() {
        assert_eq!(Command::parse("/preco"), Some(Command::Price));
        assert_eq!(Command::parse("/price"), Some(Command::Price));
        assert_eq!(Command::parse("/amanha"), Some(Command::Tomorrow));
        assert_eq!(Command::parse("/update"), Some(Command::Update));
    }

    #[test]
    fn normalizes_case_whitespace_and_bot_suffix() {
        assert_eq!(Command::parse("  /HOJE \n"), Some(Command::Today));
        assert_eq!(Command::parse("/ajuda@IndexadaBot"), Some(Command::Help));
    }

    #[test]
    fn ignores_unknown_text() {
        assert_eq!(Command::parse("preco"), None);
        assert_eq!(Command::parse("/precos"), None);
        assert_eq!(Command::parse("/preco agora"), None);
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("olá"), None);
    }
}
