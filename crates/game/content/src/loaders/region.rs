//! Region layout loader.
//!
//! A region file places props and creatures; skills are resolved against the
//! rank table at build time.

use std::path::Path;
use std::sync::Arc;

use game_core::{
    CombatStats, Creature, EntityId, Item, Position, Prop, PropBehavior, Region, RegionId,
    SkillId, SkillOracle, SkillRank, SwitchBehavior,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Behavior bound to a prop at spawn time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehaviorSpec {
    Switch,
}

impl BehaviorSpec {
    pub fn build(self) -> Arc<dyn PropBehavior> {
        match self {
            BehaviorSpec::Switch => Arc::new(SwitchBehavior),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropSpec {
    pub id: u64,
    pub name: String,
    pub position: (i32, i32),
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub behavior: Option<BehaviorSpec>,
}

impl PropSpec {
    pub fn build(&self) -> Prop {
        let prop = Prop::new(
            EntityId(self.id),
            self.name.clone(),
            Position::new(self.position.0, self.position.1),
        )
        .with_state(self.state.clone());

        match self.behavior {
            Some(behavior) => prop.with_behavior(behavior.build()),
            None => prop,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatureSpec {
    pub id: u64,
    pub name: String,
    pub position: (i32, i32),
    pub life: f32,
    #[serde(default)]
    pub mana: f32,
    #[serde(default)]
    pub stats: CombatStats,
    #[serde(default)]
    pub boss: bool,
    #[serde(default)]
    pub right_hand: Option<Item>,
    #[serde(default)]
    pub skills: Vec<(SkillId, SkillRank)>,
}

impl CreatureSpec {
    /// Builds the creature, learning every listed skill from `oracle`.
    pub fn build(&self, oracle: &dyn SkillOracle) -> LoadResult<Creature> {
        let mut creature = Creature::new(
            EntityId(self.id),
            self.name.clone(),
            Position::new(self.position.0, self.position.1),
            self.life,
        )
        .with_mana(self.mana)
        .with_stats(self.stats);
        creature.is_boss = self.boss;
        creature.right_hand = self.right_hand.clone();

        for &(skill, rank) in &self.skills {
            let learned = oracle.learn(skill, rank).ok_or_else(|| {
                anyhow::anyhow!("{}: no rank data for {} {}", self.name, skill, rank)
            })?;
            creature.skills.insert(learned);
        }

        Ok(creature)
    }
}

/// Region layout structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionSpec {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub props: Vec<PropSpec>,
    #[serde(default)]
    pub creatures: Vec<CreatureSpec>,
}

impl RegionSpec {
    /// Builds a populated region with the given random seed.
    pub fn build(&self, seed: u64, oracle: &dyn SkillOracle) -> LoadResult<Region> {
        let mut region = Region::new(RegionId(self.id), self.name.clone(), seed);

        for spec in &self.props {
            if region.spawn_prop(spec.build()).is_some() {
                anyhow::bail!("{}: duplicate prop id {:#X}", self.name, spec.id);
            }
        }
        for spec in &self.creatures {
            if region.prop(EntityId(spec.id)).is_some() {
                anyhow::bail!("{}: creature id {:#X} is used by a prop", self.name, spec.id);
            }
            if region.spawn_creature(spec.build(oracle)?).is_some() {
                anyhow::bail!("{}: duplicate creature id {:#X}", self.name, spec.id);
            }
        }

        Ok(region)
    }
}

/// Loader for region layouts from RON files.
pub struct RegionLoader;

impl RegionLoader {
    pub fn load(path: &Path) -> LoadResult<RegionSpec> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<RegionSpec> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse region RON: {}", e))
    }

    /// Load every `*.ron` layout in `dir`, sorted by file name.
    pub fn load_dir(dir: &Path) -> LoadResult<Vec<RegionSpec>> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(|e| {
            anyhow::anyhow!("Failed to read region directory {}: {}", dir.display(), e)
        })? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "ron") {
                paths.push(path);
            }
        }
        paths.sort();

        paths.iter().map(|path| Self::load(path)).collect()
    }
}
