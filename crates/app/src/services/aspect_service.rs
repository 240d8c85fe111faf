//! Aspect service: aspect writes and closure recomputation.
//!
//! Every write recomputes the full [`AspectNode`] closure. The closure is
//! computed before the write so an inconsistent taxonomy is rejected
//! without touching storage. The aspect write lands first; when storing the
//! new closure then fails, the aspect write is undone so the stored forest
//! keeps matching the stored closure.

use devmeta_domain::aspect::{Aspect, AspectNode, build_aspect_nodes};
use devmeta_domain::error::{DevMetaError, NotFoundError};
use devmeta_domain::id::AspectId;

use crate::ports::{AspectNodeRepository, AspectRepository};

/// Application service for aspect CRUD and closure lookups.
pub struct AspectService<R, N> {
    aspects: R,
    nodes: N,
}

impl<R: AspectRepository, N: AspectNodeRepository> AspectService<R, N> {
    /// Create a new service backed by the given repositories.
    pub fn new(aspects: R, nodes: N) -> Self {
        Self { aspects, nodes }
    }

    /// Create a new root aspect and recompute the closure.
    ///
    /// # Errors
    ///
    /// Returns [`DevMetaError::Validation`] if invariants fail,
    /// [`DevMetaError::Consistency`] if the resulting taxonomy is not a
    /// forest, or a storage error propagated from the repositories.
    #[tracing::instrument(skip(self, aspect), fields(aspect_id = %aspect.id))]
    pub async fn create_aspect(&self, aspect: Aspect) -> Result<Aspect, DevMetaError> {
        aspect.validate()?;
        let mut forest = self.aspects.get_all().await?;
        forest.push(aspect.clone());
        let nodes = build_aspect_nodes(&forest)?;

        let created = self.aspects.create(aspect).await?;
        if let Err(err) = self.store_nodes(nodes).await {
            tracing::warn!(error = %err, "closure write failed, undoing aspect create");
            if let Err(undo) = self.aspects.delete(created.id.clone()).await {
                tracing::error!(error = %undo, "failed to undo aspect create");
            }
            return Err(err);
        }
        Ok(created)
    }

    /// Look up a root aspect by id.
    ///
    /// # Errors
    ///
    /// Returns [`DevMetaError::NotFound`] when no root aspect with `id`
    /// exists, or a storage error from the repository.
    pub async fn get_aspect(&self, id: AspectId) -> Result<Aspect, DevMetaError> {
        self.aspects.get_by_id(id.clone()).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Aspect",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List all root aspects.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_aspects(&self) -> Result<Vec<Aspect>, DevMetaError> {
        self.aspects.get_all().await
    }

    /// Replace an existing root aspect and recompute the closure.
    ///
    /// # Errors
    ///
    /// Returns [`DevMetaError::NotFound`] when the root aspect does not
    /// exist, [`DevMetaError::Validation`] or [`DevMetaError::Consistency`]
    /// for an invalid taxonomy, or a storage error.
    #[tracing::instrument(skip(self, aspect), fields(aspect_id = %aspect.id))]
    pub async fn update_aspect(&self, aspect: Aspect) -> Result<Aspect, DevMetaError> {
        aspect.validate()?;
        let mut forest = self.aspects.get_all().await?;
        let slot = forest
            .iter_mut()
            .find(|existing| existing.id == aspect.id)
            .ok_or_else(|| NotFoundError {
                entity: "Aspect",
                id: aspect.id.to_string(),
            })?;
        let previous = std::mem::replace(slot, aspect.clone());
        let nodes = build_aspect_nodes(&forest)?;

        let updated = self.aspects.update(aspect).await?;
        if let Err(err) = self.store_nodes(nodes).await {
            tracing::warn!(error = %err, "closure write failed, undoing aspect update");
            if let Err(undo) = self.aspects.update(previous).await {
                tracing::error!(error = %undo, "failed to undo aspect update");
            }
            return Err(err);
        }
        Ok(updated)
    }

    /// Delete a root aspect (and its sub-aspects) and recompute the closure.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repositories.
    #[tracing::instrument(skip(self))]
    pub async fn delete_aspect(&self, id: AspectId) -> Result<(), DevMetaError> {
        let previous = self.aspects.get_by_id(id.clone()).await?;
        self.aspects.delete(id).await?;
        if let Err(err) = self.rebuild_aspect_nodes().await {
            tracing::warn!(error = %err, "closure write failed, undoing aspect delete");
            if let Some(previous) = previous {
                let restored = self.aspects.create(previous).await;
                if let Err(undo) = restored {
                    tracing::error!(error = %undo, "failed to undo aspect delete");
                }
            }
            return Err(err);
        }
        Ok(())
    }

    /// Recompute the closure from the stored forest, returning the node count.
    ///
    /// # Errors
    ///
    /// Returns [`DevMetaError::Consistency`] if the stored taxonomy is not a
    /// forest, or a storage error.
    pub async fn rebuild_aspect_nodes(&self) -> Result<usize, DevMetaError> {
        let forest = self.aspects.get_all().await?;
        let nodes = build_aspect_nodes(&forest)?;
        self.store_nodes(nodes).await
    }

    /// Look up the closure record of any aspect, root or nested.
    ///
    /// # Errors
    ///
    /// Returns [`DevMetaError::NotFound`] when the aspect is unknown, or a
    /// storage error from the repository.
    pub async fn get_aspect_node(&self, id: AspectId) -> Result<AspectNode, DevMetaError> {
        self.nodes.get_by_id(id.clone()).await?.ok_or_else(|| {
            NotFoundError {
                entity: "AspectNode",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Look up the closure records of `ids`, skipping unknown ids.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_aspect_nodes_by_ids(
        &self,
        ids: Vec<AspectId>,
    ) -> Result<Vec<AspectNode>, DevMetaError> {
        self.nodes.list_by_ids(ids).await
    }

    async fn store_nodes(&self, nodes: Vec<AspectNode>) -> Result<usize, DevMetaError> {
        let count = nodes.len();
        self.nodes.replace_all(nodes).await?;
        tracing::debug!(nodes = count, "aspect closure recomputed");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devmeta_domain::error::{ConsistencyError, ValidationError};
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct InMemoryAspectRepo {
        store: Mutex<Vec<Aspect>>,
    }

    impl AspectRepository for InMemoryAspectRepo {
        fn create(&self, aspect: Aspect) -> impl Future<Output = Result<Aspect, DevMetaError>> + Send {
            self.store.lock().unwrap().push(aspect.clone());
            async { Ok(aspect) }
        }

        fn get_by_id(
            &self,
            id: AspectId,
        ) -> impl Future<Output = Result<Option<Aspect>, DevMetaError>> + Send {
            let store = self.store.lock().unwrap();
            let result = store.iter().find(|a| a.id == id).cloned();
            async { Ok(result) }
        }

        fn get_all(&self) -> impl Future<Output = Result<Vec<Aspect>, DevMetaError>> + Send {
            let result = self.store.lock().unwrap().clone();
            async { Ok(result) }
        }

        fn update(&self, aspect: Aspect) -> impl Future<Output = Result<Aspect, DevMetaError>> + Send {
            let mut store = self.store.lock().unwrap();
            if let Some(slot) = store.iter_mut().find(|a| a.id == aspect.id) {
                *slot = aspect.clone();
            }
            async { Ok(aspect) }
        }

        fn delete(&self, id: AspectId) -> impl Future<Output = Result<(), DevMetaError>> + Send {
            self.store.lock().unwrap().retain(|a| a.id != id);
            async { Ok(()) }
        }
    }

    #[derive(Default)]
    struct InMemoryNodeRepo {
        store: Mutex<HashMap<AspectId, AspectNode>>,
        fail_writes: AtomicBool,
    }

    impl AspectNodeRepository for InMemoryNodeRepo {
        fn get_by_id(
            &self,
            id: AspectId,
        ) -> impl Future<Output = Result<Option<AspectNode>, DevMetaError>> + Send {
            let result = self.store.lock().unwrap().get(&id).cloned();
            async { Ok(result) }
        }

        fn list_by_ids(
            &self,
            ids: Vec<AspectId>,
        ) -> impl Future<Output = Result<Vec<AspectNode>, DevMetaError>> + Send {
            let store = self.store.lock().unwrap();
            let result: Vec<AspectNode> = ids.iter().filter_map(|id| store.get(id).cloned()).collect();
            async { Ok(result) }
        }

        fn replace_all(
            &self,
            nodes: Vec<AspectNode>,
        ) -> impl Future<Output = Result<(), DevMetaError>> + Send {
            let result = if self.fail_writes.load(Ordering::SeqCst) {
                Err(DevMetaError::Storage(Box::new(std::io::Error::other("disk full"))))
            } else {
                let mut store = self.store.lock().unwrap();
                *store = nodes.into_iter().map(|n| (n.id.clone(), n)).collect();
                Ok(())
            };
            async move { result }
        }
    }

    fn make_service() -> AspectService<InMemoryAspectRepo, InMemoryNodeRepo> {
        AspectService::new(InMemoryAspectRepo::default(), InMemoryNodeRepo::default())
    }

    fn device() -> Aspect {
        Aspect::builder()
            .id("device")
            .name("Device")
            .sub_aspect(Aspect::builder().id("cpu").name("CPU").build().unwrap())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_compute_closure_when_aspect_created() {
        let svc = make_service();
        svc.create_aspect(device()).await.unwrap();

        let cpu = svc.get_aspect_node(AspectId::from("cpu")).await.unwrap();
        assert_eq!(cpu.parent_id.as_str(), "device");
        assert_eq!(cpu.ancestor_ids, [AspectId::from("device")]);
    }

    #[tokio::test]
    async fn should_undo_create_when_closure_write_fails() {
        let svc = make_service();
        svc.nodes.fail_writes.store(true, Ordering::SeqCst);

        let result = svc.create_aspect(device()).await;

        assert!(matches!(result, Err(DevMetaError::Storage(_))));
        assert!(svc.list_aspects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_restore_previous_aspect_when_closure_write_fails_on_update() {
        let svc = make_service();
        svc.create_aspect(device()).await.unwrap();
        svc.nodes.fail_writes.store(true, Ordering::SeqCst);
        let mut renamed = device();
        renamed.sub_aspects.clear();

        let result = svc.update_aspect(renamed).await;

        assert!(matches!(result, Err(DevMetaError::Storage(_))));
        let stored = svc.get_aspect(AspectId::from("device")).await.unwrap();
        assert_eq!(stored, device());
        let cpu = svc.get_aspect_node(AspectId::from("cpu")).await.unwrap();
        assert_eq!(cpu.root_id.as_str(), "device");
    }

    #[tokio::test]
    async fn should_restore_deleted_aspect_when_closure_write_fails() {
        let svc = make_service();
        svc.create_aspect(device()).await.unwrap();
        svc.nodes.fail_writes.store(true, Ordering::SeqCst);

        let result = svc.delete_aspect(AspectId::from("device")).await;

        assert!(matches!(result, Err(DevMetaError::Storage(_))));
        assert_eq!(svc.list_aspects().await.unwrap(), vec![device()]);
    }

    #[tokio::test]
    async fn should_reject_create_when_name_is_empty() {
        let svc = make_service();
        let mut aspect = device();
        aspect.name = String::new();

        let result = svc.create_aspect(aspect).await;
        assert!(matches!(
            result,
            Err(DevMetaError::Validation(ValidationError::EmptyName { .. }))
        ));
    }

    #[tokio::test]
    async fn should_reject_create_when_id_already_used_and_leave_storage_untouched() {
        let svc = make_service();
        svc.create_aspect(device()).await.unwrap();

        let clash = Aspect::builder()
            .id("other")
            .name("Other")
            .sub_aspect(Aspect::builder().id("cpu").name("CPU").build().unwrap())
            .build()
            .unwrap();
        let result = svc.create_aspect(clash).await;
        assert!(matches!(
            result,
            Err(DevMetaError::Consistency(ConsistencyError::DuplicateAspect { .. }))
        ));
        assert_eq!(svc.list_aspects().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_recompute_closure_when_aspect_updated() {
        let svc = make_service();
        svc.create_aspect(device()).await.unwrap();

        let mut updated = device();
        updated.sub_aspects[0]
            .sub_aspects
            .push(Aspect::builder().id("core").name("Core").build().unwrap());
        svc.update_aspect(updated).await.unwrap();

        let core = svc.get_aspect_node(AspectId::from("core")).await.unwrap();
        assert_eq!(
            core.ancestor_ids,
            [AspectId::from("device"), AspectId::from("cpu")]
        );
        let device = svc.get_aspect_node(AspectId::from("device")).await.unwrap();
        assert_eq!(
            device.descendent_ids,
            [AspectId::from("cpu"), AspectId::from("core")]
        );
    }

    #[tokio::test]
    async fn should_return_not_found_when_updating_missing_aspect() {
        let svc = make_service();
        let result = svc.update_aspect(device()).await;
        assert!(matches!(result, Err(DevMetaError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_drop_nodes_when_aspect_deleted() {
        let svc = make_service();
        svc.create_aspect(device()).await.unwrap();

        svc.delete_aspect(AspectId::from("device")).await.unwrap();

        let result = svc.get_aspect_node(AspectId::from("cpu")).await;
        assert!(matches!(result, Err(DevMetaError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_list_nodes_skipping_unknown_ids() {
        let svc = make_service();
        svc.create_aspect(device()).await.unwrap();

        let nodes = svc
            .list_aspect_nodes_by_ids(vec![AspectId::from("cpu"), AspectId::from("nope")])
            .await
            .unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].id.as_str(), "cpu");
    }

    #[tokio::test]
    async fn should_return_node_count_when_rebuilding() {
        let svc = make_service();
        svc.create_aspect(device()).await.unwrap();
        assert_eq!(svc.rebuild_aspect_nodes().await.unwrap(), 2);
    }
}
