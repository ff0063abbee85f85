use fnv::FnvHashMap;

use crate::error::{Error, Result};

/// Upper bound on remote targets in flight at once
pub const MAX_TARGETS: usize = 16;

/// Offscreen texture and the framebuffer rendering into it
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RemoteTarget {
    pub texture: u32,
    pub framebuffer: u32,
    pub locked: bool,
}

impl RemoteTarget {
    pub fn new(texture: u32, framebuffer: u32) -> RemoteTarget {
        RemoteTarget {
            texture,
            framebuffer,
            locked: false,
        }
    }
}

/// Fixed set of remote targets. A target stays locked from the moment a
/// frame is rendered into it until the presentation reports it done.
pub struct TargetPool {
    targets: Vec<RemoteTarget>,
    slots: FnvHashMap<u32, usize>, // Texture to index
}

impl TargetPool {
    pub fn new(hint: usize) -> TargetPool {
        let hint = hint.min(MAX_TARGETS);

        TargetPool {
            targets: Vec::with_capacity(hint),
            slots: FnvHashMap::with_capacity_and_hasher(hint, Default::default()),
        }
    }

    pub fn insert(&mut self, target: RemoteTarget) -> Result<()> {
        if self.slots.contains_key(&target.texture) {
            return Err(Error::Backend(format!(
                "texture {} is already a remote target",
                target.texture,
            )));
        }

        self.slots.insert(target.texture, self.targets.len());
        self.targets.push(target);

        Ok(())
    }

    /// Lock and return the first free target
    pub fn acquire(&mut self) -> Option<RemoteTarget> {
        let target = self.targets.iter_mut().find(|target| !target.locked)?;
        target.locked = true;

        Some(*target)
    }

    /// Unlock the target rendering into `texture`.
    /// Returns false if no target owns that texture.
    pub fn release(&mut self, texture: u32) -> bool {
        match self.slots.get(&texture) {
            Some(&i) => {
                self.targets[i].locked = false;
                true
            },

            None => false,
        }
    }

    pub fn get(&self, texture: u32) -> Option<&RemoteTarget> {
        self.slots.get(&texture).map(|&i| &self.targets[i])
    }

    /// Remove every target, handing them back for deletion
    pub fn drain(&mut self) -> Vec<RemoteTarget> {
        self.slots.clear();
        self.targets.drain(..).collect()
    }

    pub fn locked_count(&self) -> usize {
        self.targets.iter().filter(|target| target.locked).count()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
