use crate::selection::Point;
use thiserror::Error;

/// Pointer input for the commit chart. Positions are in chart pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Brush pressed at a point.
    GestureStart(Point),
    GestureMove(Point),
    GestureEnd,
    ClearSelection,
    /// Pointer entered the marker of the commit at this index.
    PointerEnter { commit: usize, cursor: Point },
    PointerMove(Point),
    PointerLeave,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    #[error("`{0}` needs an argument")]
    MissingArgument(String),
    #[error("expected X,Y, got {0:?}")]
    BadPoint(String),
    #[error("expected INDEX@X,Y with a whole-number index, got {0:?}")]
    BadIndex(String),
    #[error("unknown action {0:?}")]
    Unknown(String),
}

impl Action {
    /// Parses the compact form used on the command line, e.g. `start:10,20`,
    /// `move:300,400`, `end`, `clear`, `enter:3@120,80`, `hover:130,90`, `leave`.
    pub fn parse(s: &str) -> Result<Self, ActionError> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name.trim(), Some(arg.trim())),
            None => (s.trim(), None),
        };
        let need = || arg.ok_or_else(|| ActionError::MissingArgument(name.to_string()));
        match name {
            "start" => Ok(Action::GestureStart(parse_point(need()?)?)),
            "move" => Ok(Action::GestureMove(parse_point(need()?)?)),
            "end" => Ok(Action::GestureEnd),
            "clear" => Ok(Action::ClearSelection),
            "enter" => {
                let arg = need()?;
                let (commit, cursor) = arg
                    .split_once('@')
                    .ok_or_else(|| ActionError::BadIndex(arg.to_string()))?;
                let commit = commit
                    .trim()
                    .parse()
                    .map_err(|_| ActionError::BadIndex(arg.to_string()))?;
                Ok(Action::PointerEnter {
                    commit,
                    cursor: parse_point(cursor)?,
                })
            }
            "hover" => Ok(Action::PointerMove(parse_point(need()?)?)),
            "leave" => Ok(Action::PointerLeave),
            other => Err(ActionError::Unknown(other.to_string())),
        }
    }
}

pub fn parse_point(s: &str) -> Result<Point, ActionError> {
    let bad = || ActionError::BadPoint(s.to_string());
    let (x, y) = s.split_once(',').ok_or_else(bad)?;
    let x = x.trim().parse::<f64>().map_err(|_| bad())?;
    let y = y.trim().parse::<f64>().map_err(|_| bad())?;
    Ok(Point::new(x, y))
}
