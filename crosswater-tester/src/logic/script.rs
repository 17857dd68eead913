//! Crossing notation: `VK> V< KK>` means a villager and a killer sail
//! right to left, the villager rows back, then two killers cross.
use crosswater_game::{CharacterKind, Side};
use regex::Regex;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("crossing {index} `{token}` is not riders followed by `>` or `<`")]
    BadToken { index: usize, token: String },
    #[error("script has no crossings")]
    Empty,
    #[error("notation pattern failed to compile: {0}")]
    Pattern(String),
}

/// One trip of the boat: who rides and which bank it leaves from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub villagers: usize,
    pub killers: usize,
    pub from: Side,
}

impl Crossing {
    #[must_use]
    pub const fn riders(&self) -> usize {
        self.villagers + self.killers
    }
}

impl fmt::Display for Crossing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let riders = "V".repeat(self.villagers) + &"K".repeat(self.killers);
        let arrow = match self.from {
            Side::Right => '>',
            Side::Left => '<',
        };
        write!(f, "{riders}{arrow}")
    }
}

pub fn parse_script(script: &str) -> Result<Vec<Crossing>, ScriptError> {
    let token_re = Regex::new(r"^(?P<riders>[VvKk]+)(?P<arrow>[<>])$")
        .map_err(|err| ScriptError::Pattern(err.to_string()))?;

    let mut crossings = Vec::new();
    for (index, token) in script.split_whitespace().enumerate() {
        let Some(caps) = token_re.captures(token) else {
            return Err(ScriptError::BadToken {
                index: index + 1,
                token: token.to_string(),
            });
        };
        let mut crossing = Crossing {
            villagers: 0,
            killers: 0,
            from: if &caps["arrow"] == ">" {
                Side::Right
            } else {
                Side::Left
            },
        };
        for glyph in caps["riders"].chars() {
            match CharacterKind::from_glyph(glyph) {
                Some(CharacterKind::Villager) => crossing.villagers += 1,
                Some(CharacterKind::Killer) => crossing.killers += 1,
                None => {
                    return Err(ScriptError::BadToken {
                        index: index + 1,
                        token: token.to_string(),
                    });
                }
            }
        }
        crossings.push(crossing);
    }

    if crossings.is_empty() {
        return Err(ScriptError::Empty);
    }
    Ok(crossings)
}
