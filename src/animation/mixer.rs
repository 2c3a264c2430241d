use std::sync::Arc;

use crate::animation::action::AnimationAction;
use crate::animation::binder::Binder;
use crate::animation::clip::AnimationClip;
use crate::animation::player::AnimationPlayer;
use crate::scene::{NodeHandle, Scene};

/// Plays clip actions against the subtree rooted at one scene node.
pub struct AnimationMixer {
    root: NodeHandle,
    actions: Vec<AnimationAction>,
}

impl AnimationMixer {
    #[must_use]
    pub fn new(root: NodeHandle) -> Self {
        Self {
            root,
            actions: Vec::new(),
        }
    }

    pub fn add_action(&mut self, action: AnimationAction) -> usize {
        self.actions.push(action);
        self.actions.len() - 1
    }

    /// Binds `clip` to the mixer's subtree and registers a stopped action for
    /// it. Returns the action index.
    pub fn clip_action(&mut self, clip: Arc<AnimationClip>, scene: &Scene) -> usize {
        let bindings = Binder::bind(scene, self.root, &clip);
        let mut action = AnimationAction::new(clip);
        action.bindings = bindings;
        self.add_action(action)
    }

    /// Starts the action at `index`. Returns `false` if there is none.
    pub fn play(&mut self, index: usize) -> bool {
        match self.actions.get_mut(index) {
            Some(action) => {
                action.play();
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn action(&self, index: usize) -> Option<&AnimationAction> {
        self.actions.get(index)
    }

    pub fn action_mut(&mut self, index: usize) -> Option<&mut AnimationAction> {
        self.actions.get_mut(index)
    }

    #[must_use]
    pub fn list_animations(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.clip().name.as_str()).collect()
    }

    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        for action in self.actions.iter_mut().filter(|a| a.is_playing()) {
            action.update(dt);
            action.apply(scene);
        }
    }
}

impl AnimationPlayer for AnimationMixer {
    fn advance(&mut self, dt: f32, scene: &mut Scene) {
        self.update(dt, scene);
    }

    fn root(&self) -> Option<NodeHandle> {
        Some(self.root)
    }
}
