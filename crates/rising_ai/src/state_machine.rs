//! Finite State Machine (FSM) implementation
//!
//! Transitions are data: each one pairs a target state with a condition on
//! a caller-supplied context. The machine does not run enter/exit hooks
//! itself; [`StateMachine::update`] and [`StateMachine::force_transition`]
//! return the change so the owner can react to it.

use std::collections::HashMap;
use std::hash::Hash;

/// A state in the state machine
pub trait State: Clone + Eq + Hash {
    /// Name used in logs and events
    fn name(&self) -> &'static str;
}

/// Transition condition
pub type TransitionCondition<C> = Box<dyn Fn(&C) -> bool + Send + Sync>;

/// A state transition
pub struct Transition<S, C> {
    /// Target state
    pub to: S,
    /// Condition function
    pub condition: TransitionCondition<C>,
    /// Priority (higher = checked first)
    pub priority: i32,
}

impl<S, C> Transition<S, C> {
    /// Create a new transition
    pub fn new<F>(to: S, condition: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Self {
            to,
            condition: Box::new(condition),
            priority: 0,
        }
    }

    /// Set priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Check if transition should occur
    pub fn should_transition(&self, context: &C) -> bool {
        (self.condition)(context)
    }
}

/// A change of state, `(from, to)`
pub type StateChange<S> = (S, S);

/// Finite State Machine
pub struct StateMachine<S, C>
where
    S: State,
{
    current: S,
    previous: Option<S>,
    /// Seconds spent in the current state
    time_in_state: f32,
    /// Transitions from each state, kept sorted by descending priority
    transitions: HashMap<S, Vec<Transition<S, C>>>,
    /// Global transitions (checked from any state, before local ones)
    global_transitions: Vec<Transition<S, C>>,
    /// States nothing can leave
    terminal: Vec<S>,
}

impl<S, C> StateMachine<S, C>
where
    S: State,
{
    /// Create a new state machine
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            previous: None,
            time_in_state: 0.0,
            transitions: HashMap::new(),
            global_transitions: Vec::new(),
            terminal: Vec::new(),
        }
    }

    /// Add a transition
    pub fn add_transition<F>(&mut self, from: S, to: S, condition: F)
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.add_transition_priority(from, to, condition, 0);
    }

    /// Add a transition with priority. Equal priorities keep insertion order.
    pub fn add_transition_priority<F>(&mut self, from: S, to: S, condition: F, priority: i32)
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        let list = self.transitions.entry(from).or_default();
        list.push(Transition::new(to, condition).with_priority(priority));
        list.sort_by(|a, b| b.priority.cmp(&a.priority));
    }

    /// Add a global transition (can occur from any state)
    pub fn add_global_transition<F>(&mut self, to: S, condition: F)
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.global_transitions.push(Transition::new(to, condition));
    }

    /// Make a state final: once entered, nothing leaves it
    pub fn add_terminal(&mut self, state: S) {
        if !self.terminal.contains(&state) {
            self.terminal.push(state);
        }
    }

    pub fn current(&self) -> &S {
        &self.current
    }

    pub fn previous(&self) -> Option<&S> {
        self.previous.as_ref()
    }

    pub fn time_in_state(&self) -> f32 {
        self.time_in_state
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal.contains(&self.current)
    }

    /// Check if in a specific state
    pub fn is_in(&self, state: &S) -> bool {
        &self.current == state
    }

    /// Force transition to a state, ignoring conditions
    ///
    /// Re-entering the current state restarts it. Returns None when the
    /// machine is in a terminal state.
    pub fn force_transition(&mut self, to: S) -> Option<StateChange<S>> {
        if self.is_terminal() {
            return None;
        }
        let from = std::mem::replace(&mut self.current, to.clone());
        self.previous = Some(from.clone());
        self.time_in_state = 0.0;
        Some((from, to))
    }

    /// Advance time and take the first transition whose condition holds
    pub fn update(&mut self, context: &C, delta_time: f32) -> Option<StateChange<S>> {
        self.time_in_state += delta_time;
        if self.is_terminal() {
            return None;
        }

        let global = self
            .global_transitions
            .iter()
            .find(|t| self.current != t.to && t.should_transition(context))
            .map(|t| t.to.clone());
        if let Some(to) = global {
            return self.force_transition(to);
        }

        let local = self.transitions.get(&self.current).and_then(|transitions| {
            transitions
                .iter()
                .find(|t| t.should_transition(context))
                .map(|t| t.to.clone())
        });
        local.and_then(|to| self.force_transition(to))
    }
}
