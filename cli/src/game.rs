use sweeper_core::*;

use crate::command::Command;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    Continue,
    Quit,
}

/// Terminal round driver: owns the session, the pending neighbourhood preview and
/// the seed sequence for new boards.
#[derive(Debug)]
pub(crate) struct Game {
    session: Session,
    preview: Option<PreviewResult>,
    seed: u64,
    round: u64,
}

impl Game {
    pub(crate) fn new(config: GameConfig, seed: u64) -> Result<Self> {
        let session = Session::generate(config, RandomBoardGenerator::new(seed))?;
        Ok(Self {
            session,
            preview: None,
            seed,
            round: 0,
        })
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn preview(&self) -> Option<&PreviewResult> {
        self.preview.as_ref()
    }

    pub(crate) fn handle(&mut self, command: Command) -> Result<Step> {
        match command {
            Command::Quit => return Ok(Step::Quit),
            Command::Help => return Ok(Step::Continue),
            Command::NewGame => self.new_game()?,
            // any input on a finished board starts the next round
            _ if self.session.is_finished() => self.new_game()?,
            Command::Open(coords) => {
                self.preview = None;
                let outcome = self.session.open_cell(coords)?;
                log::debug!("Open {:?}: {:?}", coords, outcome);
            }
            Command::Flag(coords) => {
                self.preview = None;
                let outcome = self.session.toggle_flag(coords)?;
                log::debug!("Flag {:?}: {:?}", coords, outcome);
            }
            Command::Press(coords) => {
                let preview = self.session.preview_neighborhood(coords)?;
                log::debug!("Preview {:?}, safe: {}", coords, preview.is_safe());
                self.preview = Some(preview);
            }
            Command::Release => {
                if let Some(preview) = self.preview.take() {
                    let outcome = self.session.commit_neighborhood_open(&preview)?;
                    log::debug!("Commit {:?}: {:?}", preview.target(), outcome);
                }
            }
        }

        if self.session.is_finished() {
            log::info!("Round over: {:?}", self.session.status());
        }
        Ok(Step::Continue)
    }

    fn new_game(&mut self) -> Result<()> {
        self.round += 1;
        let generator = RandomBoardGenerator::new(self.seed.wrapping_add(self.round));
        self.session.reset(generator)?;
        self.preview = None;
        log::info!("Started round {}", self.round + 1);
        Ok(())
    }
}
