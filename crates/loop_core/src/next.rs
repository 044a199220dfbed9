/// Result of a state transition: an optional replacement model plus the
/// effects to perform, in order.
///
/// `model` is `None` when the transition leaves the model untouched. A
/// present model always replaces the current one, whatever its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Next<M, Ef> {
    pub model: Option<M>,
    pub effects: Vec<Ef>,
}

impl<M, Ef> Next<M, Ef> {
    pub fn has_model_change(&self) -> bool {
        self.model.is_some()
    }

    pub fn into_parts(self) -> (Option<M>, Vec<Ef>) {
        (self.model, self.effects)
    }

    /// Converts the model half, keeping "no change" as "no change".
    pub fn map_model<N>(self, f: impl FnOnce(M) -> N) -> Next<N, Ef> {
        Next {
            model: self.model.map(f),
            effects: self.effects,
        }
    }

    pub fn map_effects<G>(self, f: impl FnMut(Ef) -> G) -> Next<M, G> {
        Next {
            model: self.model,
            effects: self.effects.into_iter().map(f).collect(),
        }
    }
}

impl<M, Ef> Default for Next<M, Ef> {
    fn default() -> Self {
        no_change()
    }
}

/// Explicit model transition with a known (possibly empty) effect list.
pub fn next<M, Ef>(model: M, effects: Vec<Ef>) -> Next<M, Ef> {
    Next {
        model: Some(model),
        effects,
    }
}

/// Model transition without effects.
pub fn next_model<M, Ef>(model: M) -> Next<M, Ef> {
    next(model, Vec::new())
}

/// Fire effects only; the model stays as it is.
pub fn dispatch_effects<M, Ef>(effects: Vec<Ef>) -> Next<M, Ef> {
    Next {
        model: None,
        effects,
    }
}

pub fn no_change<M, Ef>() -> Next<M, Ef> {
    Next {
        model: None,
        effects: Vec::new(),
    }
}
