use alertcore::{Edge, Node, WorkflowDefinition, WorkflowError, END_NODE_ID, START_NODE_ID};
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::DiGraph;
use std::collections::HashMap;

/// Validated, indexed view over a workflow definition.
///
/// Borrows the definition; nothing here is mutated during a traversal.
#[derive(Debug)]
pub struct WorkflowGraph<'a> {
    nodes: HashMap<&'a str, &'a Node>,
    outgoing: HashMap<&'a str, Vec<&'a Edge>>,
}

impl<'a> WorkflowGraph<'a> {
    /// Index the definition and check its structure
    pub fn build(workflow: &'a WorkflowDefinition) -> Result<Self, WorkflowError> {
        let mut nodes = HashMap::with_capacity(workflow.nodes.len());
        for node in &workflow.nodes {
            if nodes.insert(node.id.as_str(), node).is_some() {
                return Err(WorkflowError::DuplicateNode(node.id.clone()));
            }
        }

        if !nodes.contains_key(START_NODE_ID) {
            return Err(WorkflowError::MissingStartNode);
        }
        if !nodes.contains_key(END_NODE_ID) {
            return Err(WorkflowError::MissingEndNode);
        }

        // Declaration order is kept so fan-out is deterministic
        let mut outgoing: HashMap<&str, Vec<&Edge>> = HashMap::new();
        for edge in &workflow.edges {
            for endpoint in [&edge.source, &edge.target] {
                if !nodes.contains_key(endpoint.as_str()) {
                    return Err(WorkflowError::DanglingEdge {
                        edge: edge.id.clone(),
                        node: endpoint.clone(),
                    });
                }
            }
            outgoing.entry(edge.source.as_str()).or_default().push(edge);
        }

        let graph = Self { nodes, outgoing };
        graph.check_acyclic(workflow)?;
        Ok(graph)
    }

    fn check_acyclic(&self, workflow: &WorkflowDefinition) -> Result<(), WorkflowError> {
        let mut graph = DiGraph::<&str, ()>::new();
        let mut index = HashMap::with_capacity(workflow.nodes.len());
        for node in &workflow.nodes {
            index.insert(node.id.as_str(), graph.add_node(node.id.as_str()));
        }
        for edge in &workflow.edges {
            graph.add_edge(index[edge.source.as_str()], index[edge.target.as_str()], ());
        }

        if is_cyclic_directed(&graph) {
            return Err(WorkflowError::Cycle);
        }
        Ok(())
    }

    pub fn node(&self, id: &str) -> Option<&'a Node> {
        self.nodes.get(id).copied()
    }

    /// Outgoing edges of `id` in declaration order
    pub fn edges_from(&self, id: &str) -> &[&'a Edge] {
        self.outgoing.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Targets of `id` in declaration order
    pub fn successors(&self, id: &str) -> impl Iterator<Item = &'a str> + '_ {
        self.edges_from(id).iter().copied().map(|e| e.target.as_str())
    }

    /// First outgoing edge of `id` carrying `label`
    pub fn labeled_edge(&self, id: &str, label: &str) -> Option<&'a Edge> {
        self.edges_from(id)
            .iter()
            .copied()
            .find(|e| e.label() == Some(label))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alertcore::{Edge, NodeKind};

    fn linear() -> WorkflowDefinition {
        WorkflowDefinition::new("wf")
            .with_node(Node::new("start", NodeKind::Start))
            .with_node(Node::new("form", NodeKind::Form))
            .with_node(Node::new("end", NodeKind::End))
            .connect("start", "form")
            .connect("form", "end")
    }

    #[test]
    fn indexes_nodes_and_successors() {
        let wf = linear();
        let graph = WorkflowGraph::build(&wf).unwrap();
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.node("form").unwrap().kind, NodeKind::Form);
        assert_eq!(graph.successors("start").collect::<Vec<_>>(), vec!["form"]);
        assert_eq!(graph.successors("end").count(), 0);
    }

    #[test]
    fn fan_out_keeps_declaration_order() {
        let wf = WorkflowDefinition::new("wf")
            .with_node(Node::new("start", NodeKind::Start))
            .with_node(Node::new("b", NodeKind::Form))
            .with_node(Node::new("a", NodeKind::Form))
            .with_node(Node::new("end", NodeKind::End))
            .connect("start", "b")
            .connect("start", "a")
            .connect("a", "end");
        let graph = WorkflowGraph::build(&wf).unwrap();
        assert_eq!(graph.successors("start").collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn rejects_missing_start_and_end() {
        let no_start = WorkflowDefinition::new("wf").with_node(Node::new("end", NodeKind::End));
        assert_eq!(
            WorkflowGraph::build(&no_start).unwrap_err(),
            WorkflowError::MissingStartNode
        );

        let no_end = WorkflowDefinition::new("wf").with_node(Node::new("start", NodeKind::Start));
        assert_eq!(
            WorkflowGraph::build(&no_end).unwrap_err(),
            WorkflowError::MissingEndNode
        );
    }

    #[test]
    fn rejects_duplicate_ids() {
        let wf = linear().with_node(Node::new("form", NodeKind::Email));
        assert_eq!(
            WorkflowGraph::build(&wf).unwrap_err(),
            WorkflowError::DuplicateNode("form".into())
        );
    }

    #[test]
    fn rejects_dangling_edges() {
        let wf = linear().with_edge(Edge::new("form", "ghost"));
        match WorkflowGraph::build(&wf).unwrap_err() {
            WorkflowError::DanglingEdge { node, .. } => assert_eq!(node, "ghost"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn rejects_cycles() {
        let wf = linear().connect("end", "start");
        assert_eq!(WorkflowGraph::build(&wf).unwrap_err(), WorkflowError::Cycle);
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let wf = WorkflowDefinition::new("wf")
            .with_node(Node::new("start", NodeKind::Start))
            .with_node(Node::new("a", NodeKind::Form))
            .with_node(Node::new("b", NodeKind::Form))
            .with_node(Node::new("end", NodeKind::End))
            .connect("start", "a")
            .connect("start", "b")
            .connect("a", "end")
            .connect("b", "end");
        assert!(WorkflowGraph::build(&wf).is_ok());
    }
}
