//! Entity store seam.
//!
//! Persistence is the host's concern; the engine only needs keyed
//! load/save per entity kind, with writes from one event visible to the
//! next. `MemoryStore` is the reference implementation used by the test
//! suite and by hosts that keep the view entirely in memory.

use poolview_types::{
    Address, Bundle, Factory, Pool, Position, PositionSnapshot, Tick, Token,
};
use std::collections::BTreeMap;

/// Keyed access to the durable entity records.
///
/// Values are owned in and out; no multi-key transaction guarantees are
/// assumed beyond ordering of whole events.
pub trait EntityStore {
    fn pool(&self, address: &Address) -> Option<Pool>;
    fn put_pool(&mut self, pool: Pool);

    fn tick(&self, pool: &Address, index: i32) -> Option<Tick>;
    fn put_tick(&mut self, tick: Tick);

    fn token(&self, address: &Address) -> Option<Token>;
    fn put_token(&mut self, token: Token);

    fn position(&self, id: u64) -> Option<Position>;
    fn put_position(&mut self, position: Position);
    fn put_position_snapshot(&mut self, snapshot: PositionSnapshot);

    fn bundle(&self) -> Option<Bundle>;
    fn put_bundle(&mut self, bundle: Bundle);

    fn factory(&self, address: &Address) -> Option<Factory>;
    fn put_factory(&mut self, factory: Factory);
}

/// BTreeMap-backed store with deterministic iteration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    pools: BTreeMap<Address, Pool>,
    ticks: BTreeMap<(Address, i32), Tick>,
    tokens: BTreeMap<Address, Token>,
    positions: BTreeMap<u64, Position>,
    position_snapshots: BTreeMap<(u64, u64), PositionSnapshot>,
    bundle: Option<Bundle>,
    factories: BTreeMap<Address, Factory>,
}

impl MemoryStore {
    /// All tick records belonging to one pool, in index order. Handy for
    /// invariant checks; not part of the `EntityStore` seam.
    pub fn ticks_for_pool(&self, pool: &Address) -> Vec<&Tick> {
        self.ticks
            .range((*pool, i32::MIN)..=(*pool, i32::MAX))
            .map(|(_, tick)| tick)
            .collect()
    }

    /// Snapshots recorded for one position, oldest first.
    pub fn snapshots_for_position(&self, position_id: u64) -> Vec<&PositionSnapshot> {
        self.position_snapshots
            .range((position_id, u64::MIN)..=(position_id, u64::MAX))
            .map(|(_, snapshot)| snapshot)
            .collect()
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }
}

impl EntityStore for MemoryStore {
    fn pool(&self, address: &Address) -> Option<Pool> {
        self.pools.get(address).cloned()
    }

    fn put_pool(&mut self, pool: Pool) {
        self.pools.insert(pool.address, pool);
    }

    fn tick(&self, pool: &Address, index: i32) -> Option<Tick> {
        self.ticks.get(&(*pool, index)).cloned()
    }

    fn put_tick(&mut self, tick: Tick) {
        self.ticks.insert((tick.pool, tick.index), tick);
    }

    fn token(&self, address: &Address) -> Option<Token> {
        self.tokens.get(address).cloned()
    }

    fn put_token(&mut self, token: Token) {
        self.tokens.insert(token.address, token);
    }

    fn position(&self, id: u64) -> Option<Position> {
        self.positions.get(&id).cloned()
    }

    fn put_position(&mut self, position: Position) {
        self.positions.insert(position.id, position);
    }

    fn put_position_snapshot(&mut self, snapshot: PositionSnapshot) {
        self.position_snapshots
            .insert((snapshot.position_id, snapshot.block_number), snapshot);
    }

    fn bundle(&self) -> Option<Bundle> {
        self.bundle.clone()
    }

    fn put_bundle(&mut self, bundle: Bundle) {
        self.bundle = Some(bundle);
    }

    fn factory(&self, address: &Address) -> Option<Factory> {
        self.factories.get(address).cloned()
    }

    fn put_factory(&mut self, factory: Factory) {
        self.factories.insert(factory.address, factory);
    }
}
