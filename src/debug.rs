use std::{collections::VecDeque, fmt};

use crate::{arena::NodeId, AvlTree};

impl<K: fmt::Display, V> AvlTree<K, V> {
    /// Writes a Graphviz rendering of the tree to `w`.
    ///
    /// Nodes are labelled `key:balance`; missing children are drawn as points. Each level of the
    /// tree is laid out on one rank.
    pub fn dotgraph<W>(&self, name: &str, mut w: W) -> fmt::Result
    where
        W: fmt::Write,
    {
        let root = match self.root {
            Some(r) => r,
            None => return write!(w, "digraph \"graph-{name}\" {{}}"),
        };

        enum Item {
            Node(NodeId),
            Missing(u32),
        }

        let mut queue = VecDeque::new();
        queue.push_back(Item::Node(root));

        write!(
            w,
            "digraph \"graph-{name}\" {{\n subgraph \"subgraph-{name}\" {{"
        )?;

        let mut missing = 0;
        let mut edges = String::new();

        while !queue.is_empty() {
            use fmt::Write;

            write!(w, "{{rank=same; ")?;

            for _ in 0..queue.len() {
                let node = match queue.pop_front() {
                    Some(Item::Node(node)) => node,
                    Some(Item::Missing(id)) => {
                        write!(w, "\"graph{name}-missing{id}\" [shape=point]; ")?;
                        continue;
                    }
                    None => break,
                };

                let key = &self.arena[node].key;
                let balance = self.links(node).balance();
                write!(w, "\"graph{name}-{key}\" [label=\"{key}:{balance}\"]; ")?;

                for child in [self.links(node).left(), self.links(node).right()] {
                    match child {
                        Some(child) => {
                            let child_key = &self.arena[child].key;

                            queue.push_back(Item::Node(child));
                            writeln!(edges, "\"graph{name}-{key}\" -> \"graph{name}-{child_key}\";")?;
                        }
                        None => {
                            queue.push_back(Item::Missing(missing));
                            writeln!(
                                edges,
                                "\"graph{name}-{key}\" -> \"graph{name}-missing{missing}\";"
                            )?;
                            missing += 1;
                        }
                    }
                }
            }

            writeln!(w, "}}")?;
        }

        w.write_str(&edges)?;

        w.write_str(" }\n}")
    }
}

#[cfg(test)]
mod tests {
    use crate::AvlTree;

    #[test]
    fn empty_graph() {
        let tree: AvlTree<u32, ()> = AvlTree::new();

        let mut out = String::new();
        tree.dotgraph("t", &mut out).unwrap();
        assert_eq!(out, "digraph \"graph-t\" {}");
    }

    #[test]
    fn labels_carry_balance() {
        let tree = AvlTree::from([(20, ()), (10, ())]);

        let mut out = String::new();
        tree.dotgraph("t", &mut out).unwrap();

        assert!(out.contains("\"grapht-20\" [label=\"20:-1\"];"));
        assert!(out.contains("\"grapht-10\" [label=\"10:0\"];"));
        assert!(out.contains("\"grapht-20\" -> \"grapht-10\";"));
        assert!(out.contains("\"grapht-20\" -> \"grapht-missing0\";"));
    }
}
