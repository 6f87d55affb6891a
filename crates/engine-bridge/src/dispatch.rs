use csg_kernel::{BspKernel, Kernel};
use layout_engine::{compute_box_layout, ErrorKind};
use mesh_analysis::analyze_parts;
use solid_builder::{
    buildable_layout, generate_all, generate_box, generate_lid, generate_tray, BuildConfig,
};
use tracing::{debug, warn};

use crate::error::BridgeError;
use crate::messages::{Request, Response};

/// Dispatch a UI request to the engine and return a response.
///
/// Every request is independent: the parameters travel with it and nothing
/// is kept between calls. Failures become [`Response::Error`] carrying the
/// error class, so the UI can block export or keep the last good preview.
pub fn dispatch(kernel: &mut dyn Kernel, request: Request) -> Response {
    match handle_request(kernel, request) {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "request failed");
            Response::Error {
                message: e.to_string(),
                kind: e.kind(),
            }
        }
    }
}

/// JSON in, JSON out, with a fresh mesh kernel per request.
pub fn dispatch_json(json: &str) -> String {
    dispatch_json_with(&mut BspKernel::new(), json)
}

pub fn dispatch_json_with(kernel: &mut dyn Kernel, json: &str) -> String {
    let response = match serde_json::from_str::<Request>(json) {
        Ok(request) => dispatch(kernel, request),
        Err(e) => {
            let e = BridgeError::Serialization {
                reason: e.to_string(),
            };
            Response::Error {
                message: e.to_string(),
                kind: e.kind(),
            }
        }
    };
    serde_json::to_string(&response).unwrap_or_else(|e| {
        serde_json::json!({
            "type": "Error",
            "message": format!("serialization error: {e}"),
            "kind": ErrorKind::GeometryFailure,
        })
        .to_string()
    })
}

fn config_or_default(config: Option<BuildConfig>) -> Result<BuildConfig, BridgeError> {
    let config = config.unwrap_or_default();
    config.validate()?;
    Ok(config)
}

fn handle_request(kernel: &mut dyn Kernel, request: Request) -> Result<Response, BridgeError> {
    match request {
        Request::ComputeLayout { box_params } => {
            let layout = compute_box_layout(&box_params)?;
            Ok(Response::LayoutComputed { layout })
        }

        Request::GenerateTray {
            box_params,
            tray_id,
            config,
        } => {
            let config = config_or_default(config)?;
            let part = generate_tray(kernel, &box_params, tray_id, &config)?;
            Ok(Response::PartsGenerated { parts: vec![part] })
        }

        Request::GenerateBox { box_params, config } => {
            let config = config_or_default(config)?;
            let part = generate_box(kernel, &box_params, &config)?;
            Ok(Response::PartsGenerated { parts: vec![part] })
        }

        Request::GenerateLid { box_params, config } => {
            let config = config_or_default(config)?;
            let part = generate_lid(kernel, &box_params, &config)?;
            Ok(Response::PartsGenerated { parts: vec![part] })
        }

        Request::GenerateAll { box_params, config } => {
            let config = config_or_default(config)?;
            let parts = generate_all(kernel, &box_params, &config)?;
            Ok(Response::PartsGenerated { parts })
        }

        Request::Analyze { box_params, config } => {
            let config = config_or_default(config)?;
            let layout = buildable_layout(&box_params)?;
            let parts = generate_all(kernel, &box_params, &config)?;
            let report = analyze_parts(&layout, &parts)?;
            Ok(Response::AnalysisReady { report })
        }

        Request::DeleteCustomShape {
            mut box_params,
            tray_id,
            shape_name,
        } => {
            let box_name = box_params.name.clone();
            let tray = box_params
                .tray_mut(tray_id)
                .ok_or(BridgeError::TrayNotFound { tray_id, box_name })?;
            let migrated_stacks = tray.params.delete_custom_shape(&shape_name).ok_or_else(|| {
                BridgeError::ShapeNotFound {
                    tray: tray.name.clone(),
                    shape: shape_name.clone(),
                }
            })?;
            debug!(shape = %shape_name, migrated_stacks, "custom shape deleted");
            Ok(Response::ShapeDeleted {
                box_params,
                migrated_stacks,
            })
        }
    }
}
