//! Control signals returned from statement evaluation.
//!
//! Failures travel as `Err(EvalError)`; everything else that can leave a
//! block early is a [`Flow`]. Each construct intercepts the signals it owns
//! and passes the rest up unchanged.

use crate::value::Value;

/// Outcome of running a statement or block.
#[derive(Clone, Debug, PartialEq)]
pub enum Flow {
    /// Fell off the end; keep going.
    Normal,
    /// `return v1, v2` with the evaluated values.
    Return(Vec<Value>),
    Break,
    Continue,
    /// `yield v1, v2` inside a switch case.
    Yield(Vec<Value>),
}

/// What a loop does after one iteration of its body.
#[derive(Clone, Debug, PartialEq)]
pub enum LoopAction {
    Next,
    Exit,
    /// Leave the loop and hand this signal to the enclosing construct.
    Propagate(Flow),
}

impl Flow {
    #[inline]
    pub fn is_normal(&self) -> bool {
        matches!(self, Flow::Normal)
    }

    /// How a `for`/`while` loop reacts to this signal.
    pub fn into_loop_action(self) -> LoopAction {
        match self {
            Flow::Normal | Flow::Continue => LoopAction::Next,
            Flow::Break => LoopAction::Exit,
            other @ (Flow::Return(_) | Flow::Yield(_)) => LoopAction::Propagate(other),
        }
    }
}

/// Collapse a `return`/`yield` value list into one value: nothing for an
/// empty list, the value itself for one, a list for several.
pub fn pack_values(mut values: Vec<Value>) -> Option<Value> {
    match values.len() {
        0 => None,
        1 => values.pop(),
        _ => Some(Value::list(values)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_intercepts_break_and_continue() {
        assert_eq!(Flow::Break.into_loop_action(), LoopAction::Exit);
        assert_eq!(Flow::Continue.into_loop_action(), LoopAction::Next);
        assert_eq!(Flow::Normal.into_loop_action(), LoopAction::Next);
    }

    #[test]
    fn test_loop_passes_return_and_yield_through() {
        let ret = Flow::Return(vec![Value::Int(1)]);
        assert_eq!(ret.clone().into_loop_action(), LoopAction::Propagate(ret));
        let yielded = Flow::Yield(vec![]);
        assert_eq!(
            yielded.clone().into_loop_action(),
            LoopAction::Propagate(yielded)
        );
    }

    #[test]
    fn test_pack_values() {
        assert_eq!(pack_values(vec![]), None);
        assert_eq!(pack_values(vec![Value::Int(3)]), Some(Value::Int(3)));
        assert_eq!(
            pack_values(vec![Value::Int(1), Value::Int(2)]),
            Some(Value::list(vec![Value::Int(1), Value::Int(2)]))
        );
    }
}
