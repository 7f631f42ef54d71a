//! GPT-2 causal language model with a tied LM head.
//!
//! Weights follow the Hugging Face layout (`wte`, `wpe`, `h.{i}.*`, `ln_f`), with or without
//! the `transformer.` prefix. GPT-2 stores its projections as `Conv1D` modules, whose weight
//! matrices are `[in, out]` rather than the `[out, in]` expected by [`candle_nn::Linear`].

use std::path::Path;

use candle_core::{D, DType, Device, Module, Result, Tensor};
use candle_nn::{Embedding, LayerNorm, Linear, VarBuilder};
use serde::Deserialize;

use crate::model::files::{ModelFiles, WeightsFile};

fn default_layer_norm_epsilon() -> f64 {
    1e-5
}

fn default_activation_function() -> String {
    "gelu_new".to_string()
}

/// Subset of the Hugging Face `config.json` needed for the forward pass.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Gpt2Config {
    pub vocab_size: usize,
    pub n_positions: usize,
    pub n_embd: usize,
    pub n_layer: usize,
    pub n_head: usize,
    #[serde(default)]
    pub n_inner: Option<usize>,
    #[serde(default = "default_layer_norm_epsilon")]
    pub layer_norm_epsilon: f64,
    #[serde(default = "default_activation_function")]
    pub activation_function: String,
}

impl Gpt2Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| candle_core::Error::Msg(format!("Failed to parse GPT-2 config: {}", e)))
    }

    fn inner_dim(&self) -> usize {
        self.n_inner.unwrap_or(4 * self.n_embd)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Activation {
    GeluTanh,
    GeluErf,
    Relu,
}

impl Activation {
    fn parse(name: &str) -> Result<Self> {
        match name {
            "gelu_new" | "gelu_pytorch_tanh" | "gelu_fast" => Ok(Self::GeluTanh),
            "gelu" => Ok(Self::GeluErf),
            "relu" => Ok(Self::Relu),
            other => Err(candle_core::Error::Msg(format!(
                "unsupported activation function: {other}"
            ))),
        }
    }

    fn apply(&self, x: &Tensor) -> Result<Tensor> {
        match self {
            Self::GeluTanh => x.gelu(),
            Self::GeluErf => x.gelu_erf(),
            Self::Relu => x.relu(),
        }
    }
}

/// Dense layer with `[in, out]` weights.
struct Conv1D {
    weight: Tensor,
    bias: Tensor,
}

impl Conv1D {
    fn load(in_dim: usize, out_dim: usize, vb: VarBuilder) -> Result<Self> {
        let weight = vb.get((in_dim, out_dim), "weight")?;
        let bias = vb.get(out_dim, "bias")?;
        Ok(Self { weight, bias })
    }
}

impl Module for Conv1D {
    fn forward(&self, x: &Tensor) -> Result<Tensor> {
        x.broadcast_matmul(&self.weight)?.broadcast_add(&self.bias)
    }
}

struct SelfAttention {
    c_attn: Conv1D,
    c_proj: Conv1D,
    num_heads: usize,
    head_dim: usize,
}

impl SelfAttention {
    fn load(config: &Gpt2Config, vb: VarBuilder) -> Result<Self> {
        if !config.n_embd.is_multiple_of(config.n_head) {
            return Err(candle_core::Error::Msg(format!(
                "n_embd ({}) is not divisible by n_head ({})",
                config.n_embd, config.n_head
            )));
        }

        Ok(Self {
            c_attn: Conv1D::load(config.n_embd, 3 * config.n_embd, vb.pp("c_attn"))?,
            c_proj: Conv1D::load(config.n_embd, config.n_embd, vb.pp("c_proj"))?,
            num_heads: config.n_head,
            head_dim: config.n_embd / config.n_head,
        })
    }

    fn forward(&self, x: &Tensor, mask: &Tensor) -> Result<Tensor> {
        let (batch, seq_len, hidden) = x.dims3()?;

        let qkv = self.c_attn.forward(x)?;

        // [batch, seq, hidden] -> [batch, heads, seq, head_dim]
        let split = |idx: usize| -> Result<Tensor> {
            qkv.narrow(D::Minus1, idx * hidden, hidden)?
                .contiguous()?
                .reshape((batch, seq_len, self.num_heads, self.head_dim))?
                .transpose(1, 2)?
                .contiguous()
        };
        let q = split(0)?;
        let k = split(1)?;
        let v = split(2)?;

        let scale = 1.0 / (self.head_dim as f64).sqrt();
        let attn = (q.matmul(&k.t()?.contiguous()?)? * scale)?;
        let attn = attn.broadcast_add(mask)?;
        let attn = candle_nn::ops::softmax_last_dim(&attn)?;
        let out = attn.matmul(&v)?;

        let out = out
            .transpose(1, 2)?
            .contiguous()?
            .reshape((batch, seq_len, hidden))?;

        self.c_proj.forward(&out)
    }
}

struct Mlp {
    c_fc: Conv1D,
    c_proj: Conv1D,
    activation: Activation,
}

impl Mlp {
    fn load(config: &Gpt2Config, vb: VarBuilder) -> Result<Self> {
        let inner = config.inner_dim();
        Ok(Self {
            c_fc: Conv1D::load(config.n_embd, inner, vb.pp("c_fc"))?,
            c_proj: Conv1D::load(inner, config.n_embd, vb.pp("c_proj"))?,
            activation: Activation::parse(&config.activation_function)?,
        })
    }

    fn forward(&self, x: &Tensor) -> Result<Tensor> {
        let h = self.c_fc.forward(x)?;
        let h = self.activation.apply(&h)?;
        self.c_proj.forward(&h)
    }
}

struct Block {
    ln_1: LayerNorm,
    attn: SelfAttention,
    ln_2: LayerNorm,
    mlp: Mlp,
}

impl Block {
    fn load(config: &Gpt2Config, vb: VarBuilder) -> Result<Self> {
        let eps = config.layer_norm_epsilon;
        Ok(Self {
            ln_1: candle_nn::layer_norm(config.n_embd, eps, vb.pp("ln_1"))?,
            attn: SelfAttention::load(config, vb.pp("attn"))?,
            ln_2: candle_nn::layer_norm(config.n_embd, eps, vb.pp("ln_2"))?,
            mlp: Mlp::load(config, vb.pp("mlp"))?,
        })
    }

    fn forward(&self, x: &Tensor, mask: &Tensor) -> Result<Tensor> {
        let residual = x;
        let h = self.attn.forward(&self.ln_1.forward(x)?, mask)?;
        let x = (residual + h)?;

        let residual = &x;
        let h = self.mlp.forward(&self.ln_2.forward(&x)?)?;
        residual + h
    }
}

/// GPT-2 with the language-modelling head tied to the token embeddings.
///
/// Weights are plain tensors, so a forward pass never records gradients.
pub struct Gpt2LmHeadModel {
    wte: Embedding,
    wpe: Embedding,
    blocks: Vec<Block>,
    ln_f: LayerNorm,
    lm_head: Linear,
    config: Gpt2Config,
    device: Device,
}

impl Gpt2LmHeadModel {
    pub fn load(vb: VarBuilder, config: &Gpt2Config) -> Result<Self> {
        let device = vb.device().clone();
        let vb = if vb.contains_tensor("transformer.wte.weight") {
            vb.pp("transformer")
        } else {
            vb
        };

        let wte = candle_nn::embedding(config.vocab_size, config.n_embd, vb.pp("wte"))?;
        let wpe = candle_nn::embedding(config.n_positions, config.n_embd, vb.pp("wpe"))?;

        let mut blocks = Vec::with_capacity(config.n_layer);
        for layer_idx in 0..config.n_layer {
            blocks.push(Block::load(config, vb.pp(format!("h.{layer_idx}")))?);
        }

        let ln_f = candle_nn::layer_norm(config.n_embd, config.layer_norm_epsilon, vb.pp("ln_f"))?;
        let lm_head = Linear::new(wte.embeddings().clone(), None);

        Ok(Self {
            wte,
            wpe,
            blocks,
            ln_f,
            lm_head,
            config: config.clone(),
            device,
        })
    }

    /// Loads config and weights from resolved model files as `f32`.
    pub fn from_files(files: &ModelFiles, device: &Device) -> Result<Self> {
        let config = Gpt2Config::from_file(&files.config_path)?;

        let vb = match &files.weights {
            WeightsFile::SafeTensors(path) => {
                // SAFETY: the mmap'd file is owned by the model cache and not modified while loaded.
                unsafe { VarBuilder::from_mmaped_safetensors(&[path], DType::F32, device)? }
            }
            WeightsFile::PyTorch(path) => VarBuilder::from_pth(path, DType::F32, device)?,
        };

        Self::load(vb, &config)
    }

    /// Returns logits of shape `[batch, seq_len, vocab_size]`.
    pub fn forward(&self, input_ids: &Tensor) -> Result<Tensor> {
        let (_batch, seq_len) = input_ids.dims2()?;
        if seq_len > self.config.n_positions {
            return Err(candle_core::Error::Msg(format!(
                "sequence length {} exceeds context window {}",
                seq_len, self.config.n_positions
            )));
        }

        let positions = Tensor::arange(0u32, seq_len as u32, &self.device)?;
        let tokens = self.wte.forward(input_ids)?;
        let positions = self.wpe.forward(&positions)?;
        let mut hidden = tokens.broadcast_add(&positions)?;

        let mask = causal_mask(seq_len, &self.device)?;
        for block in &self.blocks {
            hidden = block.forward(&hidden, &mask)?;
        }

        let hidden = self.ln_f.forward(&hidden)?;
        self.lm_head.forward(&hidden)
    }

    /// Mean next-token cross-entropy of `token_ids` used as their own labels.
    ///
    /// Logits at position `i` are scored against token `i + 1`, so at least two tokens are
    /// required.
    pub fn mean_loss(&self, token_ids: &[u32]) -> Result<f32> {
        let seq_len = token_ids.len();
        if seq_len < 2 {
            return Err(candle_core::Error::Msg(format!(
                "need at least 2 tokens to compute a shifted loss, got {seq_len}"
            )));
        }

        let input_ids = Tensor::new(token_ids, &self.device)?.unsqueeze(0)?;
        let logits = self.forward(&input_ids)?.squeeze(0)?;

        let shift_logits = logits.narrow(0, 0, seq_len - 1)?;
        let labels = Tensor::new(&token_ids[1..], &self.device)?;

        candle_nn::loss::cross_entropy(&shift_logits, &labels)?
            .to_dtype(DType::F32)?
            .to_scalar::<f32>()
    }

    pub fn config(&self) -> &Gpt2Config {
        &self.config
    }
}

/// Returns a `[1, 1, seq_len, seq_len]` mask: 0.0 where attention is allowed, -inf above
/// the diagonal.
pub(crate) fn causal_mask(seq_len: usize, device: &Device) -> Result<Tensor> {
    let mask: Vec<f32> = (0..seq_len)
        .flat_map(|i| (0..seq_len).map(move |j| if j <= i { 0.0 } else { f32::NEG_INFINITY }))
        .collect();

    Tensor::from_vec(mask, (1, 1, seq_len, seq_len), device)
}
