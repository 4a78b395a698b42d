//! Economy - the village's shared counters
//!
//! Counters only move through deliveries, food consumption, population
//! changes and build costs. Debits that would go negative are rejected
//! whole; nothing is ever clamped.

use serde::{Deserialize, Serialize};

use crate::city::structure::{Cost, StructureKind};
use crate::core::error::{Result, VillageError};

/// A stockpiled good
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commodity {
    Wood,
    Stone,
    Food,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Economy {
    pub wood: u32,
    pub stone: u32,
    pub food: u32,
    pub population: u32,
    pub max_population: u32,
}

impl Economy {
    pub fn new(wood: u32, stone: u32, food: u32, max_population: u32) -> Self {
        Self {
            wood,
            stone,
            food,
            population: 0,
            max_population,
        }
    }

    pub fn get(&self, commodity: Commodity) -> u32 {
        match commodity {
            Commodity::Wood => self.wood,
            Commodity::Stone => self.stone,
            Commodity::Food => self.food,
        }
    }

    fn slot_mut(&mut self, commodity: Commodity) -> &mut u32 {
        match commodity {
            Commodity::Wood => &mut self.wood,
            Commodity::Stone => &mut self.stone,
            Commodity::Food => &mut self.food,
        }
    }

    /// Credit a delivery
    pub fn deposit(&mut self, commodity: Commodity, amount: u32) {
        let slot = self.slot_mut(commodity);
        *slot = slot.saturating_add(amount);
    }

    /// Eat `amount` food, or fail without touching the store
    pub fn consume_food(&mut self, amount: u32) -> Result<()> {
        match self.food.checked_sub(amount) {
            Some(rest) => {
                self.food = rest;
                Ok(())
            }
            None => Err(VillageError::InsufficientFood {
                requested: amount,
                available: self.food,
            }),
        }
    }

    pub fn can_afford(&self, cost: &Cost) -> bool {
        self.wood >= cost.wood && self.stone >= cost.stone && self.food >= cost.food
    }

    /// Debit a build cost, all or nothing
    pub fn spend(&mut self, kind: StructureKind, cost: &Cost) -> Result<()> {
        if !self.can_afford(cost) {
            return Err(VillageError::InsufficientResources {
                kind,
                wood: cost.wood,
                stone: cost.stone,
                food: cost.food,
            });
        }
        self.wood -= cost.wood;
        self.stone -= cost.stone;
        self.food -= cost.food;
        Ok(())
    }

    pub fn has_room(&self) -> bool {
        self.population < self.max_population
    }

    /// Reserve a population slot for a new villager
    pub fn add_villager(&mut self) -> Result<()> {
        if !self.has_room() {
            return Err(VillageError::PopulationCap {
                population: self.population,
                max_population: self.max_population,
            });
        }
        self.population += 1;
        Ok(())
    }

    pub fn remove_villager(&mut self) {
        debug_assert!(self.population > 0, "population underflow");
        self.population = self.population.saturating_sub(1);
    }

    pub fn raise_max_population(&mut self, amount: u32) {
        self.max_population = self.max_population.saturating_add(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_and_get() {
        let mut economy = Economy::new(0, 0, 0, 5);
        economy.deposit(Commodity::Wood, 15);
        economy.deposit(Commodity::Food, 8);
        assert_eq!(economy.get(Commodity::Wood), 15);
        assert_eq!(economy.get(Commodity::Stone), 0);
        assert_eq!(economy.get(Commodity::Food), 8);
    }

    #[test]
    fn test_consume_food_rejects_overdraw() {
        let mut economy = Economy::new(0, 0, 1, 5);
        assert!(economy.consume_food(1).is_ok());
        assert_eq!(economy.food, 0);

        let err = economy.consume_food(1).unwrap_err();
        assert_eq!(
            err,
            VillageError::InsufficientFood {
                requested: 1,
                available: 0
            }
        );
        assert_eq!(economy.food, 0);
    }

    #[test]
    fn test_spend_is_all_or_nothing() {
        let mut economy = Economy::new(50, 5, 0, 5);
        let cost = Cost {
            wood: 40,
            stone: 10,
            food: 0,
        };

        assert!(economy.spend(StructureKind::Tent, &cost).is_err());
        assert_eq!(economy.wood, 50, "wood untouched on failure");
        assert_eq!(economy.stone, 5);

        economy.deposit(Commodity::Stone, 5);
        assert!(economy.spend(StructureKind::Tent, &cost).is_ok());
        assert_eq!(economy.wood, 10);
        assert_eq!(economy.stone, 0);
    }

    #[test]
    fn test_population_cap() {
        let mut economy = Economy::new(0, 0, 0, 2);
        assert!(economy.add_villager().is_ok());
        assert!(economy.add_villager().is_ok());
        assert!(matches!(
            economy.add_villager(),
            Err(VillageError::PopulationCap {
                population: 2,
                max_population: 2
            })
        ));

        economy.raise_max_population(2);
        assert!(economy.add_villager().is_ok());
        economy.remove_villager();
        assert_eq!(economy.population, 2);
    }
}
