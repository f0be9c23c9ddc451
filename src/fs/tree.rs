//! Namespace Tree
//!
//! The in-memory hierarchical namespace: an arena of Directory/File nodes
//! with ordered child maps, path resolution, and the six mutating
//! primitives. Every operation is all-or-nothing: preconditions are checked
//! before the first structural change, so a failure leaves the tree exactly
//! as it was.

use super::types::{DirEntry, EntryKind, FsError, Node, NodeId, NodeKind, WalkEntry};

/// The namespace tree. Nodes live in an arena indexed by `NodeId`; the
/// root is always a Directory with an empty name and no parent.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    root: NodeId,
}

impl Tree {
    /// Create a tree holding a single empty root directory.
    pub fn new() -> Self {
        let root = Node {
            name: String::new(),
            parent: None,
            kind: NodeKind::empty_directory(),
        };
        Self {
            nodes: vec![root],
            free: Vec::new(),
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Walk from the root by successive name lookups. `None` if any segment
    /// is missing or an intermediate segment is not a Directory.
    pub fn resolve(&self, path: &str) -> Option<NodeId> {
        let normalized = normalize_path(path);
        let mut current = self.root;
        for segment in normalized.split('/').filter(|s| !s.is_empty()) {
            match &self.nodes[current.0].kind {
                NodeKind::Directory { children } => match children.get(segment) {
                    Some(&child) => current = child,
                    None => return None,
                },
                NodeKind::File { .. } => return None,
            }
        }
        Some(current)
    }

    /// Resolve the parent directory of `path` and derive the base name (the
    /// final segment). The root has no parent and no base name.
    pub fn resolve_parent(&self, path: &str, operation: &str) -> Result<(NodeId, String), FsError> {
        let normalized = normalize_path(path);
        if normalized == "/" {
            return Err(FsError::InvalidArgument {
                path: normalized,
                operation: operation.to_string(),
            });
        }
        let pos = normalized.rfind('/').unwrap_or(0);
        let (dir, base) = if pos == 0 {
            ("/".to_string(), normalized[1..].to_string())
        } else {
            (normalized[..pos].to_string(), normalized[pos + 1..].to_string())
        };
        let parent = self.resolve(&dir).ok_or_else(|| FsError::NotFound {
            path: dir.clone(),
            operation: operation.to_string(),
        })?;
        if !self.nodes[parent.0].kind.is_directory() {
            return Err(FsError::NotDirectory {
                path: dir,
                operation: operation.to_string(),
            });
        }
        Ok((parent, base))
    }

    /// Insert a new empty Directory at `path`.
    pub fn create_directory(&mut self, path: &str) -> Result<NodeId, FsError> {
        let (parent, name) = self.resolve_parent(path, "mkdir")?;
        if self.child_of(parent, &name).is_some() {
            return Err(FsError::AlreadyExists {
                path: normalize_path(path),
                operation: "mkdir".to_string(),
            });
        }
        Ok(self.attach_new(parent, name, NodeKind::empty_directory()))
    }

    /// Detach an empty Directory from its parent.
    pub fn delete_directory(&mut self, path: &str) -> Result<(), FsError> {
        let normalized = normalize_path(path);
        let id = self
            .resolve(&normalized)
            .ok_or_else(|| not_found(&normalized, "rmdir"))?;
        let node = &self.nodes[id.0];
        match &node.kind {
            NodeKind::Directory { children } => {
                if !children.is_empty() {
                    return Err(FsError::NotEmpty {
                        path: normalized,
                        operation: "rmdir".to_string(),
                    });
                }
            }
            NodeKind::File { .. } => {
                return Err(FsError::NotDirectory {
                    path: normalized,
                    operation: "rmdir".to_string(),
                });
            }
        }
        let parent = node.parent.ok_or_else(|| FsError::InvalidArgument {
            path: normalized,
            operation: "rmdir".to_string(),
        })?;
        self.detach(parent, id);
        self.release(id);
        Ok(())
    }

    /// Insert a new File, or replace the payload of an existing one in full.
    pub fn create_or_replace_file(&mut self, path: &str, content: &str) -> Result<NodeId, FsError> {
        let (parent, name) = self.resolve_parent(path, "write")?;
        match self.child_of(parent, &name) {
            Some(existing) => match &mut self.nodes[existing.0].kind {
                NodeKind::File { content: payload } => {
                    *payload = content.to_string();
                    Ok(existing)
                }
                NodeKind::Directory { .. } => Err(FsError::NotFile {
                    path: normalize_path(path),
                    operation: "write".to_string(),
                }),
            },
            None => Ok(self.attach_new(
                parent,
                name,
                NodeKind::File {
                    content: content.to_string(),
                },
            )),
        }
    }

    /// Detach a File from its parent.
    pub fn delete_file(&mut self, path: &str) -> Result<(), FsError> {
        let normalized = normalize_path(path);
        let id = self
            .resolve(&normalized)
            .ok_or_else(|| not_found(&normalized, "rm"))?;
        if self.nodes[id.0].kind.is_directory() {
            return Err(FsError::IsDirectory {
                path: normalized,
                operation: "rm".to_string(),
            });
        }
        let parent = self.nodes[id.0].parent.ok_or_else(|| FsError::InvalidArgument {
            path: normalized,
            operation: "rm".to_string(),
        })?;
        self.detach(parent, id);
        self.release(id);
        Ok(())
    }

    /// Move a node (File or Directory subtree) to a new path, renaming it to
    /// the destination base name. The destination must not exist.
    pub fn rename(&mut self, from: &str, to: &str) -> Result<(), FsError> {
        let from_norm = normalize_path(from);
        let src = self
            .resolve(&from_norm)
            .ok_or_else(|| not_found(&from_norm, "rename"))?;
        let old_parent = self.nodes[src.0].parent.ok_or_else(|| FsError::InvalidArgument {
            path: from_norm.clone(),
            operation: "rename".to_string(),
        })?;
        let (new_parent, new_name) = self.resolve_parent(to, "rename")?;
        if self.child_of(new_parent, &new_name).is_some() {
            return Err(FsError::AlreadyExists {
                path: normalize_path(to),
                operation: "rename".to_string(),
            });
        }
        // A directory must not become its own descendant.
        if self.nodes[src.0].kind.is_directory() && self.is_ancestor_of(src, new_parent) {
            return Err(FsError::InvalidArgument {
                path: normalize_path(to),
                operation: "rename".to_string(),
            });
        }
        self.detach(old_parent, src);
        let node = &mut self.nodes[src.0];
        node.name = new_name.clone();
        node.parent = Some(new_parent);
        if let NodeKind::Directory { children } = &mut self.nodes[new_parent.0].kind {
            children.insert(new_name, src);
        }
        Ok(())
    }

    /// Duplicate a File's payload at a new path. The source is untouched;
    /// directory copy is not supported.
    pub fn copy_file(&mut self, from: &str, to: &str) -> Result<NodeId, FsError> {
        let from_norm = normalize_path(from);
        let src = self
            .resolve(&from_norm)
            .ok_or_else(|| not_found(&from_norm, "cp"))?;
        let content = match &self.nodes[src.0].kind {
            NodeKind::File { content } => content.clone(),
            NodeKind::Directory { .. } => {
                return Err(FsError::Unsupported {
                    path: from_norm,
                    operation: "cp".to_string(),
                });
            }
        };
        let (parent, name) = self.resolve_parent(to, "cp")?;
        if self.child_of(parent, &name).is_some() {
            return Err(FsError::AlreadyExists {
                path: normalize_path(to),
                operation: "cp".to_string(),
            });
        }
        Ok(self.attach_new(parent, name, NodeKind::File { content }))
    }

    /// Ordered children of a Directory, for listing.
    pub fn list(&self, path: &str) -> Result<Vec<DirEntry>, FsError> {
        let normalized = normalize_path(path);
        let id = self
            .resolve(&normalized)
            .ok_or_else(|| not_found(&normalized, "scandir"))?;
        match &self.nodes[id.0].kind {
            NodeKind::Directory { children } => Ok(children
                .iter()
                .map(|(name, &child)| DirEntry {
                    name: name.clone(),
                    kind: self.entry_kind(child),
                })
                .collect()),
            NodeKind::File { .. } => Err(FsError::NotDirectory {
                path: normalized,
                operation: "scandir".to_string(),
            }),
        }
    }

    /// The payload of a File.
    pub fn read_file(&self, path: &str) -> Result<&str, FsError> {
        let normalized = normalize_path(path);
        let id = self
            .resolve(&normalized)
            .ok_or_else(|| not_found(&normalized, "read"))?;
        match &self.nodes[id.0].kind {
            NodeKind::File { content } => Ok(content),
            NodeKind::Directory { .. } => Err(FsError::NotFile {
                path: normalized,
                operation: "read".to_string(),
            }),
        }
    }

    /// Depth-first listing of an entire subtree, depth-annotated.
    pub fn walk(&self, path: &str) -> Result<Vec<WalkEntry>, FsError> {
        let normalized = normalize_path(path);
        let id = self
            .resolve(&normalized)
            .ok_or_else(|| not_found(&normalized, "walk"))?;
        if !self.nodes[id.0].kind.is_directory() {
            return Err(FsError::NotDirectory {
                path: normalized,
                operation: "walk".to_string(),
            });
        }
        let mut out = Vec::new();
        self.walk_into(id, 0, &mut out);
        Ok(out)
    }

    /// Reconstruct a node's absolute path by climbing the parent links.
    pub fn path_of(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        let mut current = Some(id);
        while let Some(cur) = current {
            let node = &self.nodes[cur.0];
            if node.parent.is_some() {
                parts.push(node.name.clone());
            }
            current = node.parent;
        }
        if parts.is_empty() {
            "/".to_string()
        } else {
            parts.reverse();
            format!("/{}", parts.join("/"))
        }
    }

    /// Allocate a node and attach it under `parent`. The caller must have
    /// verified that `parent` is a Directory without a child of this name.
    pub(crate) fn attach_new(&mut self, parent: NodeId, name: String, kind: NodeKind) -> NodeId {
        debug_assert!(self.nodes[parent.0].kind.is_directory());
        let id = self.alloc(Node {
            name: name.clone(),
            parent: Some(parent),
            kind,
        });
        if let NodeKind::Directory { children } = &mut self.nodes[parent.0].kind {
            children.insert(name, id);
        }
        id
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = node;
                id
            }
            None => {
                self.nodes.push(node);
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        self.free.push(id);
    }

    fn detach(&mut self, parent: NodeId, id: NodeId) {
        let name = self.nodes[id.0].name.clone();
        if let NodeKind::Directory { children } = &mut self.nodes[parent.0].kind {
            // shift_remove keeps the remaining siblings in listing order
            children.shift_remove(&name);
        }
    }

    fn child_of(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        match &self.nodes[parent.0].kind {
            NodeKind::Directory { children } => children.get(name).copied(),
            NodeKind::File { .. } => None,
        }
    }

    /// True if `ancestor` is `id` itself or appears on `id`'s parent chain.
    fn is_ancestor_of(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            if cur == ancestor {
                return true;
            }
            current = self.nodes[cur.0].parent;
        }
        false
    }

    fn walk_into(&self, id: NodeId, depth: usize, out: &mut Vec<WalkEntry>) {
        if let NodeKind::Directory { children } = &self.nodes[id.0].kind {
            for (name, &child) in children {
                out.push(WalkEntry {
                    name: name.clone(),
                    depth,
                    kind: self.entry_kind(child),
                });
                self.walk_into(child, depth + 1, out);
            }
        }
    }

    fn entry_kind(&self, id: NodeId) -> EntryKind {
        if self.nodes[id.0].kind.is_directory() {
            EntryKind::Directory
        } else {
            EntryKind::File
        }
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(path: &str, operation: &str) -> FsError {
    FsError::NotFound {
        path: path.to_string(),
        operation: operation.to_string(),
    }
}

pub fn normalize_path(path: &str) -> String {
    if path.is_empty() || path == "/" {
        return "/".to_string();
    }
    let mut resolved: Vec<&str> = Vec::new();
    for part in path.split('/').filter(|p| !p.is_empty() && *p != ".") {
        if part == ".." {
            resolved.pop();
        } else {
            resolved.push(part);
        }
    }
    if resolved.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", resolved.join("/"))
    }
}
