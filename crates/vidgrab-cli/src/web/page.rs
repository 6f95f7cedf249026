//! The single HTML page served at `/`.

pub(super) const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>vidgrab</title>
<style>
  body { font-family: sans-serif; max-width: 42rem; margin: 2rem auto; padding: 0 1rem; }
  input[type=url] { width: 100%; padding: .4rem; }
  #details { display: none; margin-top: 1rem; }
  #details img { max-width: 100%; }
  progress { width: 100%; }
  .ok { color: #176f2c; } .err { color: #a4161a; }
</style>
</head>
<body>
<h1>Video Downloader</h1>
<label for="url">Enter video URL:</label>
<input id="url" type="url" placeholder="https://www.youtube.com/watch?v=...">
<button id="load">Load</button>

<div id="details">
  <p><strong id="title"></strong> <span id="duration"></span></p>
  <img id="thumb" alt="Thumbnail">
  <p>
    <label for="resolution">Select resolution:</label>
    <select id="resolution"></select>
    <button id="download">Download</button>
  </p>
</div>

<progress id="bar" max="1" value="0" hidden></progress>
<p id="status"></p>

<script>
const $ = (id) => document.getElementById(id);

function setStatus(text, cls) {
  $("status").textContent = text || "";
  $("status").className = cls || "";
}

async function postJson(path, body) {
  const res = await fetch(path, {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify(body),
  });
  const data = await res.json();
  if (!res.ok) throw new Error(data.error || res.statusText);
  return data;
}

$("load").onclick = async () => {
  setStatus("Fetching video details... Please wait.");
  $("details").style.display = "none";
  try {
    const info = await postJson("/api/info", { url: $("url").value });
    $("title").textContent = info.title;
    $("duration").textContent = info.duration_secs != null ? "(" + info.duration_secs + " seconds)" : "";
    if (info.thumbnail_url) { $("thumb").src = info.thumbnail_url; $("thumb").hidden = false; }
    else { $("thumb").hidden = true; }
    const sel = $("resolution");
    sel.innerHTML = "";
    for (const r of info.resolutions) {
      const opt = document.createElement("option");
      opt.value = r; opt.textContent = r;
      sel.appendChild(opt);
    }
    $("download").disabled = info.resolutions.length === 0;
    $("details").style.display = "block";
    setStatus(info.resolutions.length ? "" : "No downloadable streams found.", info.resolutions.length ? "" : "err");
  } catch (e) {
    setStatus("An error occurred: " + e.message, "err");
  }
};

async function poll() {
  const s = await (await fetch("/api/progress")).json();
  const bar = $("bar");
  bar.hidden = false;
  bar.value = s.total_bytes > 0 ? s.bytes_done / s.total_bytes : (s.state === "done" ? 1 : 0);
  if (s.state === "running") {
    setStatus(s.message);
    setTimeout(poll, 500);
  } else if (s.state === "done") {
    setStatus(s.message, "ok");
    $("download").disabled = false;
  } else if (s.state === "failed") {
    setStatus(s.message, "err");
    $("download").disabled = false;
  }
}

$("download").onclick = async () => {
  $("download").disabled = true;
  try {
    await postJson("/api/download", { url: $("url").value, resolution: $("resolution").value });
    poll();
  } catch (e) {
    setStatus("An error occurred: " + e.message, "err");
    $("download").disabled = false;
  }
};
</script>
</body>
</html>
"#;
