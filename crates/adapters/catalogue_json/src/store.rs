//! In-memory implementation of every storage port over a loaded [`Catalogue`].

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;

use devmeta_app::ports::{
    AspectNodeRepository, AspectRepository, DeviceTypeListOptions, DeviceTypeRepository,
    FunctionRepository,
};
use devmeta_domain::aspect::{Aspect, AspectNode, build_aspect_nodes};
use devmeta_domain::device_type::DeviceType;
use devmeta_domain::error::DevMetaError;
use devmeta_domain::function::Function;
use devmeta_domain::id::{AspectId, DeviceTypeId, FunctionId};

use crate::catalogue::Catalogue;

#[derive(Debug, Default)]
struct State {
    aspects: Vec<Aspect>,
    nodes: HashMap<AspectId, AspectNode>,
    functions: Vec<Function>,
    device_types: Vec<DeviceType>,
}

/// Shared, cloneable handle on the catalogue.
///
/// Implements [`AspectRepository`], [`AspectNodeRepository`],
/// [`FunctionRepository`] and [`DeviceTypeRepository`]; clones share state.
#[derive(Debug, Clone, Default)]
pub struct CatalogueStore {
    state: Arc<RwLock<State>>,
}

impl CatalogueStore {
    /// Index `catalogue`, computing the aspect closure.
    ///
    /// # Errors
    ///
    /// Returns [`DevMetaError::Consistency`] if the aspects do not form a forest.
    pub fn new(catalogue: Catalogue) -> Result<Self, DevMetaError> {
        let nodes = build_aspect_nodes(&catalogue.aspects)?;
        let state = State {
            aspects: catalogue.aspects,
            nodes: nodes.into_iter().map(|node| (node.id.clone(), node)).collect(),
            functions: catalogue.functions,
            device_types: catalogue.device_types,
        };
        Ok(Self {
            state: Arc::new(RwLock::new(state)),
        })
    }

    /// Copy the current content back into a [`Catalogue`].
    pub async fn snapshot(&self) -> Catalogue {
        let state = self.state.read().await;
        Catalogue {
            aspects: state.aspects.clone(),
            functions: state.functions.clone(),
            device_types: state.device_types.clone(),
        }
    }
}

impl AspectRepository for CatalogueStore {
    fn create(&self, aspect: Aspect) -> impl Future<Output = Result<Aspect, DevMetaError>> + Send {
        let state = Arc::clone(&self.state);
        async move {
            state.write().await.aspects.push(aspect.clone());
            Ok(aspect)
        }
    }

    fn get_by_id(
        &self,
        id: AspectId,
    ) -> impl Future<Output = Result<Option<Aspect>, DevMetaError>> + Send {
        let state = Arc::clone(&self.state);
        async move {
            let state = state.read().await;
            Ok(state.aspects.iter().find(|aspect| aspect.id == id).cloned())
        }
    }

    fn get_all(&self) -> impl Future<Output = Result<Vec<Aspect>, DevMetaError>> + Send {
        let state = Arc::clone(&self.state);
        async move { Ok(state.read().await.aspects.clone()) }
    }

    fn update(&self, aspect: Aspect) -> impl Future<Output = Result<Aspect, DevMetaError>> + Send {
        let state = Arc::clone(&self.state);
        async move {
            let mut state = state.write().await;
            if let Some(slot) = state.aspects.iter_mut().find(|a| a.id == aspect.id) {
                *slot = aspect.clone();
            }
            Ok(aspect)
        }
    }

    fn delete(&self, id: AspectId) -> impl Future<Output = Result<(), DevMetaError>> + Send {
        let state = Arc::clone(&self.state);
        async move {
            state.write().await.aspects.retain(|aspect| aspect.id != id);
            Ok(())
        }
    }
}

impl AspectNodeRepository for CatalogueStore {
    fn get_by_id(
        &self,
        id: AspectId,
    ) -> impl Future<Output = Result<Option<AspectNode>, DevMetaError>> + Send {
        let state = Arc::clone(&self.state);
        async move { Ok(state.read().await.nodes.get(&id).cloned()) }
    }

    fn list_by_ids(
        &self,
        ids: Vec<AspectId>,
    ) -> impl Future<Output = Result<Vec<AspectNode>, DevMetaError>> + Send {
        let state = Arc::clone(&self.state);
        async move {
            let state = state.read().await;
            Ok(ids
                .iter()
                .filter_map(|id| state.nodes.get(id).cloned())
                .collect())
        }
    }

    fn replace_all(
        &self,
        nodes: Vec<AspectNode>,
    ) -> impl Future<Output = Result<(), DevMetaError>> + Send {
        let state = Arc::clone(&self.state);
        async move {
            state.write().await.nodes = nodes
                .into_iter()
                .map(|node| (node.id.clone(), node))
                .collect();
            Ok(())
        }
    }
}

impl FunctionRepository for CatalogueStore {
    fn get_by_id(
        &self,
        id: FunctionId,
    ) -> impl Future<Output = Result<Option<Function>, DevMetaError>> + Send {
        let state = Arc::clone(&self.state);
        async move {
            let state = state.read().await;
            Ok(state.functions.iter().find(|f| f.id == id).cloned())
        }
    }

    fn list_by_ids(
        &self,
        ids: Vec<FunctionId>,
    ) -> impl Future<Output = Result<Vec<Function>, DevMetaError>> + Send {
        let state = Arc::clone(&self.state);
        async move {
            let state = state.read().await;
            Ok(state
                .functions
                .iter()
                .filter(|f| ids.contains(&f.id))
                .cloned()
                .collect())
        }
    }
}

impl DeviceTypeRepository for CatalogueStore {
    fn get_by_id(
        &self,
        id: DeviceTypeId,
    ) -> impl Future<Output = Result<Option<DeviceType>, DevMetaError>> + Send {
        let state = Arc::clone(&self.state);
        async move {
            let state = state.read().await;
            Ok(state.device_types.iter().find(|dt| dt.id == id).cloned())
        }
    }

    fn list(
        &self,
        options: DeviceTypeListOptions,
    ) -> impl Future<Output = Result<Vec<DeviceType>, DevMetaError>> + Send {
        let state = Arc::clone(&self.state);
        async move {
            let state = state.read().await;
            let matching = state
                .device_types
                .iter()
                .filter(|dt| options.accepts(dt))
                .skip(options.offset)
                .take(options.limit.unwrap_or(usize::MAX))
                .cloned()
                .collect::<Vec<_>>();
            tracing::trace!(count = matching.len(), "listed device types");
            Ok(matching)
        }
    }
}
