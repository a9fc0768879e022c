//! Target constructor selection.
//!
//! ```text
//! Initial ──forced──> Forced ─────────────────────────────> Done
//!    │
//!    └──> Primary ──satisfied──────────────────────────────> Done
//!            │
//!            └──> Single ──one constructor / zero-arg──────> Done
//!                    │
//!                    └──> Candidates ──exactly one─────────> Done
//!                                    └─none / several──────> Done (error)
//! ```

use super::intent::IntentSet;
use crate::error::MappingError;
use morph_schema::{ClassDecl, Constructor, Parameter, TypeRef};
use serde::Serialize;
use tracing::debug;

/// Why a constructor was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Named by the request's constructor signature.
    Forced,
    /// The primary constructor, with every required parameter mapped.
    Primary,
    /// The only constructor.
    Single,
    /// The parameterless constructor.
    ZeroArg,
    /// The only constructor the intents can satisfy.
    Unique,
}

#[derive(Debug, Clone, Copy)]
pub struct ConstructorChoice<'a> {
    pub constructor: &'a Constructor,
    pub selection: Selection,
}

enum State<'a> {
    Initial,
    Forced(&'a [TypeRef]),
    Primary(&'a Constructor),
    Single,
    Candidates,
    Done(Result<ConstructorChoice<'a>, MappingError>),
}

/// Whether `param` can be left out or filled in from the intents.
fn satisfiable_param(param: &Parameter, intents: &IntentSet) -> bool {
    match intents.for_target(&param.name) {
        Some(intent) if !intent.is_ignored() => true,
        Some(_) => param.has_default || param.ty.nullable,
        None => param.has_default,
    }
}

fn satisfiable(constructor: &Constructor, intents: &IntentSet) -> bool {
    constructor.params.iter().all(|p| satisfiable_param(p, intents))
}

/// Every parameter that is neither defaulted nor nullable has a usable intent.
fn fully_satisfied(constructor: &Constructor, intents: &IntentSet) -> bool {
    constructor
        .params
        .iter()
        .filter(|p| !p.has_default && !p.ty.nullable)
        .all(|p| intents.for_target(&p.name).is_some_and(|i| !i.is_ignored()))
}

/// Pick the constructor of `class` the mapping calls.
pub fn select_constructor<'a>(
    target: &str,
    class: &'a ClassDecl,
    intents: &IntentSet,
    forced: Option<&'a [TypeRef]>,
) -> Result<ConstructorChoice<'a>, MappingError> {
    let choose = |constructor: &'a Constructor, selection: Selection| State::Done(Ok(ConstructorChoice { constructor, selection }));
    let no_match = || {
        State::Done(Err(MappingError::NoMatchingConstructor {
            target: target.to_string(),
            forced: forced.map(<[TypeRef]>::to_vec),
        }))
    };

    let mut state = State::Initial;
    loop {
        state = match state {
            State::Initial => {
                if class.constructors.is_empty() {
                    no_match()
                } else if let Some(signature) = forced {
                    State::Forced(signature)
                } else if let Some(primary) = class.primary_constructor() {
                    State::Primary(primary)
                } else {
                    State::Single
                }
            }
            State::Forced(signature) => {
                match class.constructors.iter().find(|c| c.signature() == signature) {
                    Some(constructor) => choose(constructor, Selection::Forced),
                    None => no_match(),
                }
            }
            State::Primary(primary) => {
                if fully_satisfied(primary, intents) {
                    choose(primary, Selection::Primary)
                } else {
                    State::Single
                }
            }
            State::Single => {
                if let [only] = class.constructors.as_slice() {
                    choose(only, Selection::Single)
                } else if let Some(empty) = class.constructors.iter().find(|c| c.params.is_empty()) {
                    choose(empty, Selection::ZeroArg)
                } else {
                    State::Candidates
                }
            }
            State::Candidates => {
                let candidates: Vec<&Constructor> = class
                    .constructors
                    .iter()
                    .filter(|c| satisfiable(c, intents))
                    .collect();
                match candidates.as_slice() {
                    [] => no_match(),
                    [only] => choose(only, Selection::Unique),
                    several => State::Done(Err(MappingError::AmbiguousConstructor {
                        target: target.to_string(),
                        candidates: several.iter().map(|c| c.describe()).collect(),
                    })),
                }
            }
            State::Done(result) => {
                if let Ok(choice) = &result {
                    debug!(
                        class = target,
                        constructor = %choice.constructor.describe(),
                        selection = ?choice.selection,
                        "selected constructor"
                    );
                }
                return result;
            }
        };
    }
}
