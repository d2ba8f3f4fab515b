//! `switch` as a statement and as an expression.
//!
//! Every case key is evaluated before one is chosen, so ambiguity is an
//! error rather than first-match-wins.

use rad_ir::ast::{Switch, SwitchBody};

use super::Interpreter;
use crate::environment::Environment;
use crate::errors::{switch_multiple_match, switch_no_match, switch_no_value, EvalResult};
use crate::flow::{pack_values, Flow};
use crate::value::Value;

/// Result of a switch used for its value.
pub(super) enum SwitchOutcome {
    Value(Value),
    /// A case block left through `return`, `break` or `continue`.
    Escape(Flow),
}

impl Interpreter<'_> {
    fn select_case<'s>(
        &mut self,
        switch: &'s Switch,
        env: &Environment,
    ) -> EvalResult<&'s SwitchBody> {
        let discriminant = self.eval_expr(&switch.discriminant, env)?;
        let mut chosen = None;
        let mut matches = 0usize;
        for case in &switch.cases {
            let mut hit = false;
            for key in &case.keys {
                hit |= self.eval_expr(key, env)?.equals(&discriminant);
            }
            if hit {
                matches += 1;
                chosen.get_or_insert(&case.body);
            }
        }
        match (matches, chosen) {
            (1, Some(body)) => Ok(body),
            (0, _) => switch
                .default
                .as_ref()
                .ok_or_else(|| switch_no_match().with_span(switch.discriminant.span)),
            _ => Err(switch_multiple_match().with_span(switch.span)),
        }
    }

    /// A switch statement. Case values are evaluated and discarded; `yield`
    /// ends the case.
    pub(super) fn exec_switch_stmt(&mut self, switch: &Switch, env: &Environment) -> EvalResult<Flow> {
        match self.select_case(switch, env)? {
            SwitchBody::Values(values) => {
                for value in values {
                    self.eval_maybe_void(value, env)?;
                }
                Ok(Flow::Normal)
            }
            SwitchBody::Block(block) => match self.exec_block(block, env)? {
                Flow::Yield(_) => Ok(Flow::Normal),
                flow => Ok(flow),
            },
        }
    }

    /// A switch in value position. Several case values become a list.
    pub(super) fn eval_switch_expr(
        &mut self,
        switch: &Switch,
        env: &Environment,
    ) -> EvalResult<SwitchOutcome> {
        match self.select_case(switch, env)? {
            SwitchBody::Values(exprs) => {
                let mut values = Vec::with_capacity(exprs.len());
                for expr in exprs {
                    if let Some(value) = self.eval_maybe_void(expr, env)? {
                        values.push(value);
                    }
                }
                pack_values(values)
                    .map(SwitchOutcome::Value)
                    .ok_or_else(|| switch_no_value().with_span(switch.span))
            }
            SwitchBody::Block(block) => match self.exec_block(block, env)? {
                Flow::Yield(values) => pack_values(values)
                    .map(SwitchOutcome::Value)
                    .ok_or_else(|| switch_no_value().with_span(switch.span)),
                Flow::Normal => Err(switch_no_value().with_span(switch.span)),
                flow => Ok(SwitchOutcome::Escape(flow)),
            },
        }
    }
}
