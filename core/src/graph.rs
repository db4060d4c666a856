use std::collections::HashMap;

/// Dense, 1-based node identifier assigned in node-table order.
///
/// 0 is never assigned to a loaded node. It can still show up as a successor
/// when malformed adjacency tokens are coerced (see [`crate::MalformedPolicy`]),
/// so traversal treats it as an ordinary id with no name.
pub type NodeId = u32;

/// Ordered node names plus the inverse name index.
///
/// `names[0]` is an unused placeholder so that `names[id]` is the name of `id`.
#[derive(Debug, Clone)]
pub struct NodeTable {
    names: Vec<String>,
    index: HashMap<String, NodeId>,
    /// Names seen more than once. The first occurrence keeps the index entry.
    pub duplicates: usize,
}

impl NodeTable {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(node_count: usize) -> Self {
        let mut names = Vec::with_capacity(node_count + 1);
        names.push(String::new());
        Self {
            names,
            index: HashMap::with_capacity(node_count),
            duplicates: 0,
        }
    }

    /// Append a name, returning its id. Callers guarantee the id space is not exhausted.
    pub(crate) fn push(&mut self, name: String) -> NodeId {
        let id = self.names.len() as NodeId;
        match self.index.entry(name) {
            std::collections::hash_map::Entry::Occupied(e) => {
                self.duplicates += 1;
                self.names.push(e.key().clone());
            }
            std::collections::hash_map::Entry::Vacant(e) => {
                self.names.push(e.key().clone());
                e.insert(id);
            }
        }
        id
    }

    /// Number of loaded nodes (the placeholder slot is not counted).
    pub fn len(&self) -> usize {
        self.names.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for NodeTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Directed adjacency: source id → successors in file order.
///
/// Duplicates and self-loops are kept as given.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    outgoing: HashMap<NodeId, Vec<NodeId>>,
    edges: usize,
    /// Tokens that were not clean integers (coerced or dropped per policy).
    pub malformed: usize,
}

impl Adjacency {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(sources: usize) -> Self {
        Self {
            outgoing: HashMap::with_capacity(sources),
            edges: 0,
            malformed: 0,
        }
    }

    /// Make `source` present even if it ends up with no successors.
    pub(crate) fn touch(&mut self, source: NodeId) {
        self.outgoing.entry(source).or_default();
    }

    pub fn push(&mut self, source: NodeId, successor: NodeId) {
        self.outgoing.entry(source).or_default().push(successor);
        self.edges += 1;
    }

    pub fn edge_count(&self) -> usize {
        self.edges
    }

    pub fn source_count(&self) -> usize {
        self.outgoing.len()
    }
}

/// Immutable link graph: node table, name index and outbound adjacency.
///
/// Built once and then shared read-only by any number of concurrent searches.
/// Nothing in here is mutated during traversal, so `&Graph` is all a search needs.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: NodeTable,
    adjacency: Adjacency,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for a known graph size.
    pub fn with_capacity(node_count: usize, source_count: usize) -> Self {
        Self {
            nodes: NodeTable::with_capacity(node_count),
            adjacency: Adjacency::with_capacity(source_count),
        }
    }

    pub fn from_parts(nodes: NodeTable, adjacency: Adjacency) -> Self {
        Self { nodes, adjacency }
    }

    /// Register a node under the next dense id.
    pub fn add_node(&mut self, name: impl Into<String>) -> NodeId {
        self.nodes.push(name.into())
    }

    /// Add a directed edge. Neither endpoint has to be in the node table.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) {
        self.adjacency.push(from, to);
    }

    pub fn id_of(&self, name: &str) -> Option<NodeId> {
        self.nodes.index.get(name).copied()
    }

    pub fn name_of(&self, id: NodeId) -> Option<&str> {
        if id == 0 {
            return None;
        }
        self.nodes.names.get(id as usize).map(String::as_str)
    }

    /// Whether `id` names a loaded node.
    pub fn contains(&self, id: NodeId) -> bool {
        id != 0 && (id as usize) < self.nodes.names.len()
    }

    /// Outbound links of `id`. Ids without an adjacency entry have none.
    pub fn successors_of(&self, id: NodeId) -> &[NodeId] {
        self.adjacency
            .outgoing
            .get(&id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.edge_count()
    }

    /// Number of ids with an adjacency entry.
    pub fn source_count(&self) -> usize {
        self.adjacency.source_count()
    }

    pub fn duplicate_names(&self) -> usize {
        self.nodes.duplicates
    }

    pub fn malformed_tokens(&self) -> usize {
        self.adjacency.malformed
    }

    /// Approximate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        let name_bytes: usize = self.nodes.names.iter().map(|n| n.capacity()).sum();
        let table_mem = self.nodes.names.capacity() * size_of::<String>() + name_bytes;
        // Index keys are separate allocations from the table's strings.
        let index_mem = self.nodes.index.len() * (size_of::<String>() + size_of::<NodeId>() + 16)
            + name_bytes;
        let adj_mem: usize = self
            .adjacency
            .outgoing
            .values()
            .map(|v| size_of::<NodeId>() + size_of::<Vec<NodeId>>() + 16 + v.capacity() * size_of::<NodeId>())
            .sum();

        table_mem + index_mem + adj_mem
    }
}
