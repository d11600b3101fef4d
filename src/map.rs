use crate::config::HumanSize;

/// Index document with the share payload limit filled in.
pub(crate) fn render_index(max_payload_bytes: usize) -> String {
    INDEX_HTML
        .replace("__MAX_PAYLOAD_BYTES__", &max_payload_bytes.to_string())
        .replace("__MAX_PAYLOAD_LABEL__", &HumanSize(max_payload_bytes).to_string())
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0"/>
  <title>GeoShare</title>
  <link rel="stylesheet" href="https://unpkg.com/maplibre-gl@4.7.1/dist/maplibre-gl.css" />
  <style>
    html, body { height: 100%; margin: 0; padding: 0; font-family: system-ui, sans-serif; }
    #map { position: absolute; inset: 0; }
    #panel {
      position: absolute; top: 12px; left: 12px; z-index: 10; width: 280px;
      background: white; border-radius: 6px; padding: 10px;
      box-shadow: 0 1px 4px rgba(0,0,0,0.3);
    }
    #dropzone {
      border: 2px dashed #93c5fd; border-radius: 6px; padding: 14px;
      text-align: center; color: #1e40af; cursor: pointer;
    }
    #dropzone.dragover { background: #dbeafe; }
    #files { list-style: none; margin: 8px 0 0 0; padding: 0; }
    #files li { display: flex; align-items: center; gap: 6px; padding: 3px 0; }
    #files li .name { flex: 1; overflow: hidden; text-overflow: ellipsis; white-space: nowrap; }
    #files li.hidden .name { color: #9ca3af; text-decoration: line-through; }
    #files button { border: none; background: none; cursor: pointer; padding: 0 2px; }
    #share-box { margin-top: 8px; display: flex; gap: 4px; }
    #share-box input { flex: 1; }
    #readonly-banner {
      background: #fef3c7; color: #92400e; padding: 6px; border-radius: 4px; margin-bottom: 6px;
    }
    #toasts { position: absolute; bottom: 24px; left: 50%; transform: translateX(-50%); z-index: 20; }
    .toast {
      background: #1f2937; color: white; padding: 8px 12px; border-radius: 4px;
      margin-top: 6px; box-shadow: 0 1px 4px rgba(0,0,0,0.3);
    }
    .popup td.key { font-weight: bold; padding-right: 8px; }
  </style>
</head>
<body>
  <div id="map"></div>
  <div id="panel">
    <div id="readonly-banner" hidden>Read-only shared map</div>
    <label id="dropzone">
      Drop .geojson / .json files here or click to choose
      <input id="fileInput" type="file" accept=".geojson,.json" multiple hidden />
    </label>
    <ul id="files"></ul>
    <div id="share-box" hidden>
      <input id="share-url" readonly />
      <button id="copy-btn">Copy</button>
    </div>
  </div>
  <div id="toasts"></div>

  <script src="https://unpkg.com/maplibre-gl@4.7.1/dist/maplibre-gl.js"></script>
  <script>
    const MAX_PAYLOAD_BYTES = __MAX_PAYLOAD_BYTES__;
    const MAX_PAYLOAD_LABEL = "__MAX_PAYLOAD_LABEL__";
    const PRIMARY = "#2563eb";
    const PRIMARY_DARK = "#1e40af";
    const VIEW_MATCH = location.pathname.match(/^\/v\/([A-Za-z0-9_-]+)$/);
    const READ_ONLY = location.pathname.startsWith("/v/");

    function toast(message) {
      const el = document.createElement("div");
      el.className = "toast";
      el.textContent = message;
      document.getElementById("toasts").appendChild(el);
      setTimeout(() => el.remove(), 4000);
    }

    function escapeHtml(s) {
      return String(s).replace(/[&<>"']/g, c => ({
        "&": "&amp;", "<": "&lt;", ">": "&gt;", '"': "&quot;", "'": "&#39;"
      })[c]);
    }

    // Flatten nested coordinate arrays; a leaf is an array starting with a number.
    function computeBounds(geojson) {
      let minx = Infinity, miny = Infinity, maxx = -Infinity, maxy = -Infinity;
      const walk = node => {
        if (!Array.isArray(node) || node.length === 0) return;
        if (typeof node[0] === "number") {
          if (typeof node[1] !== "number") throw new Error("malformed position");
          minx = Math.min(minx, node[0]); maxx = Math.max(maxx, node[0]);
          miny = Math.min(miny, node[1]); maxy = Math.max(maxy, node[1]);
        } else {
          node.forEach(walk);
        }
      };
      const visit = g => {
        if (!g) return;
        walk(g.coordinates);
        (g.geometries || []).forEach(visit);
      };
      try {
        (geojson.features || []).forEach(f => visit(f && f.geometry));
      } catch (e) {
        return null;
      }
      return minx <= maxx && miny <= maxy ? [[minx, miny], [maxx, maxy]] : null;
    }

    // Owns the loaded files and their sources/layers on one map.
    class Registry {
      constructor(map, onChange) {
        this.map = map;
        this.onChange = onChange;
        this.files = [];
        this.nextId = 1;
        this.loadedOnce = false;
      }

      layerSet(id) {
        const source = `file-${id}`;
        return {
          source,
          layers: [
            { id: `${source}-polygons`, type: "fill", geom: "Polygon",
              paint: { "fill-color": PRIMARY, "fill-opacity": 0.354 } },
            { id: `${source}-polygons-outline`, type: "line", geom: "Polygon",
              paint: { "line-color": PRIMARY, "line-width": 3 } },
            { id: `${source}-lines`, type: "line", geom: "LineString",
              paint: { "line-color": PRIMARY_DARK, "line-width": 4, "line-opacity": 0.9 } },
            { id: `${source}-points`, type: "circle", geom: "Point",
              paint: { "circle-radius": 7, "circle-color": PRIMARY,
                       "circle-stroke-width": 2, "circle-stroke-color": "#ffffff" } },
          ],
        };
      }

      add(name, geojson) {
        if (!geojson || geojson.type !== "FeatureCollection") {
          throw new Error(`'${name}' is not a GeoJSON FeatureCollection`);
        }
        const id = this.nextId++;
        const set = this.layerSet(id);
        try {
          this.map.addSource(set.source, { type: "geojson", data: geojson });
          set.layers.forEach(l => this.map.addLayer({
            id: l.id, type: l.type, source: set.source,
            filter: ["==", ["geometry-type"], l.geom], paint: l.paint,
          }));
        } catch (e) {
          this.destroy(set);
          throw e;
        }
        const bounds = computeBounds(geojson);
        if (!this.loadedOnce) {
          this.loadedOnce = true;
          if (bounds) this.map.fitBounds(bounds, { padding: 40, duration: 500 });
        }
        const entry = { id, name, geojson, bounds, set, visible: true };
        this.files.push(entry);
        this.onChange();
        return entry;
      }

      destroy(set) {
        set.layers.forEach(l => { if (this.map.getLayer(l.id)) this.map.removeLayer(l.id); });
        if (this.map.getSource(set.source)) this.map.removeSource(set.source);
      }

      remove(id) {
        const i = this.files.findIndex(f => f.id === id);
        if (i < 0) return;
        this.destroy(this.files[i].set);
        this.files.splice(i, 1);
        this.onChange();
      }

      toggle(id) {
        const f = this.files.find(f => f.id === id);
        if (!f) return;
        f.visible = !f.visible;
        f.set.layers.forEach(l =>
          this.map.setLayoutProperty(l.id, "visibility", f.visible ? "visible" : "none"));
        this.onChange();
      }

      zoomTo(id) {
        const f = this.files.find(f => f.id === id);
        if (f && f.bounds) this.map.fitBounds(f.bounds, { padding: 40, duration: 500 });
      }

      interactiveLayers() {
        return this.files.flatMap(f =>
          f.set.layers.filter(l => !l.id.endsWith("-outline")).map(l => l.id));
      }

      shareFiles() {
        return this.files.map(f => ({ name: f.name, geojson: f.geojson }));
      }
    }

    const map = new maplibregl.Map({
      container: "map",
      style: "https://basemaps.cartocdn.com/gl/positron-gl-style/style.json",
      center: [0, 0],
      zoom: 2,
    });
    map.addControl(new maplibregl.NavigationControl(), "top-right");

    const registry = new Registry(map, renderPanel);

    function renderPanel() {
      const list = document.getElementById("files");
      list.innerHTML = "";
      registry.files.forEach(f => {
        const li = document.createElement("li");
        if (!f.visible) li.className = "hidden";
        li.innerHTML = `<span class="name" title="${escapeHtml(f.name)}">${escapeHtml(f.name)}</span>`;
        const button = (label, title, action) => {
          const b = document.createElement("button");
          b.textContent = label;
          b.title = title;
          b.onclick = action;
          li.appendChild(b);
        };
        button(f.visible ? "👁" : "🚫", "Toggle visibility", () => registry.toggle(f.id));
        button("🔍", "Zoom to file", () => registry.zoomTo(f.id));
        if (!READ_ONLY) button("✕", "Remove", () => registry.remove(f.id));
        list.appendChild(li);
      });
    }

    map.on("mousemove", e => {
      const layers = registry.interactiveLayers();
      const hit = layers.length && map.queryRenderedFeatures(e.point, { layers }).length;
      map.getCanvas().style.cursor = hit ? "pointer" : "";
    });

    map.on("click", e => {
      const layers = registry.interactiveLayers();
      if (!layers.length) return;
      const features = map.queryRenderedFeatures(e.point, { layers });
      if (!features.length) return;
      const rows = Object.entries(features[0].properties || {})
        .map(([k, v]) => `<tr><td class="key">${escapeHtml(k)}</td><td>${escapeHtml(v)}</td></tr>`)
        .join("");
      new maplibregl.Popup().setLngLat(e.lngLat)
        .setHTML(`<div class="popup"><table>${rows}</table></div>`).addTo(map);
    });

    map.getCanvas().addEventListener("contextmenu", e => e.preventDefault());

    function readFile(file) {
      return new Promise(resolve => {
        if (!/\.(geojson|json)$/i.test(file.name)) {
          toast(`'${file.name}' is not a .geojson or .json file`);
          return resolve();
        }
        const reader = new FileReader();
        reader.onload = () => {
          try {
            registry.add(file.name, JSON.parse(reader.result));
          } catch (e) {
            toast(e instanceof SyntaxError ? `'${file.name}' is not valid JSON` : e.message);
          }
          resolve();
        };
        reader.onerror = () => { toast(`Could not read '${file.name}'`); resolve(); };
        reader.readAsText(file);
      });
    }

    async function handleFiles(fileList) {
      const before = registry.files.length;
      await Promise.all(Array.from(fileList).map(readFile));
      if (!READ_ONLY && registry.files.length && registry.files.length !== before) {
        await share();
      }
    }

    async function share() {
      const body = JSON.stringify({ files: registry.shareFiles() });
      if (new Blob([body]).size > MAX_PAYLOAD_BYTES) {
        toast(`Files are too large to share (limit is ${MAX_PAYLOAD_LABEL})`);
        return;
      }
      try {
        const res = await fetch("/api/share", {
          method: "POST", headers: { "Content-Type": "application/json" }, body,
        });
        if (res.status === 413) {
          toast(`Files are too large to share (limit is ${MAX_PAYLOAD_LABEL})`);
          return;
        }
        if (!res.ok) {
          const msg = await res.json().then(b => b.error).catch(() => res.statusText);
          toast(`Failed to create share link: ${msg}`);
          return;
        }
        const { id } = await res.json();
        showShareBox(`${location.origin}/v/${id}`);
      } catch (e) {
        toast("Network failure while creating share link");
      }
    }

    function showShareBox(url) {
      const input = document.getElementById("share-url");
      const button = document.getElementById("copy-btn");
      input.value = url;
      document.getElementById("share-box").hidden = false;
      button.onclick = async () => {
        try {
          await navigator.clipboard.writeText(url);
          button.textContent = "Copied";
          setTimeout(() => (button.textContent = "Copy"), 1200);
        } catch {
          input.select();
        }
      };
    }

    async function hydrate() {
      if (!VIEW_MATCH) {
        toast("Shared map not found");
        return;
      }
      try {
        const res = await fetch(`/api/view/${VIEW_MATCH[1]}`);
        if (!res.ok) {
          toast("Shared map not found (maybe expired)");
          return;
        }
        const bundle = await res.json();
        bundle.files.forEach(f => {
          try {
            registry.add(f.name, f.geojson);
          } catch (e) {
            toast(e.message);
          }
        });
      } catch (e) {
        toast("Failed to load shared map");
      }
    }

    if (READ_ONLY) {
      document.getElementById("readonly-banner").hidden = false;
      document.getElementById("dropzone").hidden = true;
    } else {
      const dropzone = document.getElementById("dropzone");
      document.getElementById("fileInput").addEventListener("change", e => {
        handleFiles(e.target.files);
        e.target.value = "";
      });
      ["dragenter", "dragover"].forEach(name => dropzone.addEventListener(name, e => {
        e.preventDefault();
        dropzone.classList.add("dragover");
      }));
      ["dragleave", "drop"].forEach(name => dropzone.addEventListener(name, e => {
        e.preventDefault();
        dropzone.classList.remove("dragover");
      }));
      dropzone.addEventListener("drop", e => handleFiles(e.dataTransfer.files));
    }

    map.on("load", () => {
      map.getStyle().layers
        .filter(l => l.type === "fill" && l.id.includes("water"))
        .forEach(l => map.setPaintProperty(l.id, "fill-color", "#dbeafe"));
      if (READ_ONLY) hydrate();
    });
  </script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_mentions_configured_limit() {
        let html = render_index(20 * 1024 * 1024);
        assert!(html.contains("const MAX_PAYLOAD_BYTES = 20971520;"));
        assert!(html.contains(r#"const MAX_PAYLOAD_LABEL = "20 MB";"#));
        assert!(!html.contains("__MAX_PAYLOAD"));
    }

    #[test]
    fn payload_check_counts_encoded_bytes() {
        let html = render_index(1024);
        assert!(html.contains("new Blob([body]).size > MAX_PAYLOAD_BYTES"));
        assert!(!html.contains("body.length > MAX_PAYLOAD_BYTES"));
    }
}
