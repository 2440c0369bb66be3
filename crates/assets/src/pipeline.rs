use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use crate::error::{AssetError, LoadStage, PipelineFailure};
use crate::material::MaterialSet;
use crate::model::ModelData;
use crate::request::LoadRequest;

/// Tagged result of one load pipeline.
pub type LoadOutcome = Result<ModelData, PipelineFailure>;

fn open(path: &Path) -> Result<BufReader<File>, AssetError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| AssetError::io(path, e))
}

/// Stage one: parse an MTL material library.
pub fn load_materials(path: &Path) -> Result<MaterialSet, AssetError> {
    let mut reader = open(path)?;
    let (materials, _) =
        tobj::load_mtl_buf(&mut reader).map_err(|e| AssetError::parse(path, e))?;
    tracing::debug!(path = %path.display(), count = materials.len(), "materials parsed");
    Ok(MaterialSet::from_tobj(materials))
}

/// Stage two: parse OBJ geometry with `materials` attached.
///
/// Faces are triangulated and re-indexed so each part is ready for upload.
/// `usemtl` names resolve against `materials` whatever `mtllib` the file
/// names.
pub fn load_geometry(
    name: &str,
    path: &Path,
    materials: MaterialSet,
) -> Result<ModelData, AssetError> {
    let mut reader = open(path)?;
    let (models, _) = tobj::load_obj_buf(&mut reader, &tobj::GPU_LOAD_OPTIONS, |_| {
        materials.to_mtl_load_result()
    })
    .map_err(|e| AssetError::parse(path, e))?;
    ModelData::from_tobj(name, path, models, materials)
}

/// Run both stages for one request. Never panics on bad input.
pub fn run_pipeline(request: &LoadRequest) -> LoadOutcome {
    let _span = tracing::info_span!("load_pipeline", model = %request.name).entered();
    let started = Instant::now();

    let fail = |stage, error| PipelineFailure {
        request: request.name.clone(),
        stage,
        error,
    };

    let materials =
        load_materials(&request.materials).map_err(|e| fail(LoadStage::Materials, e))?;
    let model = load_geometry(&request.name, &request.geometry, materials)
        .map_err(|e| fail(LoadStage::Geometry, e))?;

    tracing::info!(
        parts = model.parts.len(),
        triangles = model.triangle_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Loading complete: {}",
        request.name
    );
    Ok(model)
}
