use super::*;

/// Hands out a prepared board, used for scripted rounds where the layout is known up front.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedBoardGenerator {
    board: Board,
}

impl FixedBoardGenerator {
    pub fn new(board: Board) -> Self {
        Self { board }
    }
}

impl BoardGenerator for FixedBoardGenerator {
    fn generate(self, config: GameConfig) -> Result<Board> {
        let config = config.validate()?;
        if self.board.game_config() == config {
            Ok(self.board)
        } else {
            log::warn!(
                "Fixed board {:?} does not match requested config {:?}",
                self.board.game_config(),
                config
            );
            Err(GameError::InvalidConfig {
                width: config.size.0,
                height: config.size.1,
                mines: config.mines,
            })
        }
    }
}
