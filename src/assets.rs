use crate::core::MeshData;
use crate::dom::js_err;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

async fn fetch_response(url: &str) -> anyhow::Result<web::Response> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let resp = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(js_err)?;
    let resp: web::Response = resp.dyn_into().map_err(js_err)?;
    if !resp.ok() {
        anyhow::bail!("HTTP {} for {}", resp.status(), url);
    }
    Ok(resp)
}

pub async fn fetch_array_buffer(url: &str) -> anyhow::Result<js_sys::ArrayBuffer> {
    let resp = fetch_response(url).await?;
    let buf = JsFuture::from(resp.array_buffer().map_err(js_err)?)
        .await
        .map_err(js_err)?;
    buf.dyn_into::<js_sys::ArrayBuffer>().map_err(js_err)
}

/// Fetch and decode a matcap image into tightly packed RGBA8.
pub async fn load_matcap(url: &str) -> anyhow::Result<image::RgbaImage> {
    let buf = fetch_array_buffer(url).await?;
    let bytes = js_sys::Uint8Array::new(&buf).to_vec();
    let img = image::load_from_memory(&bytes)?;
    Ok(img.to_rgba8())
}

/// Fetch an audio file and let the browser decode it.
pub async fn load_audio_buffer(
    ctx: &web::AudioContext,
    url: &str,
) -> anyhow::Result<web::AudioBuffer> {
    let buf = fetch_array_buffer(url).await?;
    let decoded = JsFuture::from(ctx.decode_audio_data(&buf).map_err(js_err)?)
        .await
        .map_err(js_err)?;
    decoded.dyn_into::<web::AudioBuffer>().map_err(js_err)
}

/// Ask the host's mesh decoder for `url`.
///
/// The decoder returns (a promise of) `{ positions, normals?, indices? }` with
/// typed arrays; normals are recomputed when absent.
pub async fn load_mesh(decoder: &js_sys::Function, url: &str) -> anyhow::Result<MeshData> {
    let value = decoder
        .call1(&JsValue::NULL, &JsValue::from_str(url))
        .map_err(js_err)?;
    let decoded = JsFuture::from(js_sys::Promise::resolve(&value))
        .await
        .map_err(js_err)?;
    let positions = read_f32_array(&decoded, "positions")?
        .ok_or_else(|| anyhow::anyhow!("decoded mesh for {} has no positions", url))?;
    let normals = read_f32_array(&decoded, "normals")?;
    let indices = read_index_array(&decoded, "indices")?;
    Ok(MeshData::from_flat(&positions, normals.as_deref(), indices)?)
}

fn read_field(obj: &JsValue, key: &str) -> anyhow::Result<Option<JsValue>> {
    let v = js_sys::Reflect::get(obj, &JsValue::from_str(key)).map_err(js_err)?;
    Ok((!v.is_undefined() && !v.is_null()).then_some(v))
}

fn read_f32_array(obj: &JsValue, key: &str) -> anyhow::Result<Option<Vec<f32>>> {
    match read_field(obj, key)? {
        Some(v) => {
            let arr = v
                .dyn_into::<js_sys::Float32Array>()
                .map_err(|_| anyhow::anyhow!("`{}` is not a Float32Array", key))?;
            Ok(Some(arr.to_vec()))
        }
        None => Ok(None),
    }
}

fn read_index_array(obj: &JsValue, key: &str) -> anyhow::Result<Option<Vec<u32>>> {
    let Some(v) = read_field(obj, key)? else {
        return Ok(None);
    };
    if let Some(arr) = v.dyn_ref::<js_sys::Uint32Array>() {
        return Ok(Some(arr.to_vec()));
    }
    if let Some(arr) = v.dyn_ref::<js_sys::Uint16Array>() {
        return Ok(Some(arr.to_vec().into_iter().map(u32::from).collect()));
    }
    anyhow::bail!("`{}` is not a Uint32Array or Uint16Array", key)
}
